//! Script-level destructuring declarations

use lowering_tests::{RecordingStatements, ScriptFixture, SimpleMembers};
use rv_descriptors::Ty;
use rv_ir::{
    IrExprKind, IrStatement, IrType, IrUnit, Origin, StatementOrigin, SymbolKind, SymbolTable,
};
use rv_ir_lower::{LoweringError, LoweringOptions};
use rv_span::Span;
use rv_syntax::SyntaxKind;

fn lower(
    fixture: &ScriptFixture,
    symbols: &SymbolTable,
    options: &LoweringOptions,
) -> (IrUnit, RecordingStatements) {
    let mut statements = RecordingStatements::default();
    let unit = fixture
        .lower(symbols, options, &mut statements, &mut SimpleMembers::default())
        .unwrap();
    (unit, statements)
}

fn assignments(unit: &IrUnit, block: &IrStatement) -> Vec<IrStatement> {
    let IrStatement::Expression(block) = block else {
        panic!("expected the assignment block, got {block:?}");
    };
    let IrExprKind::Block { statements, origin } = &unit[*block].kind else {
        panic!("expected a block, got {:?}", unit[*block].kind);
    };
    assert_eq!(*origin, Some(StatementOrigin::DestructuringDeclaration));
    statements.clone()
}

#[test]
fn test_pair_destructuring() {
    let mut fixture = ScriptFixture::new("pairs");
    let pair = fixture.class("Pair");
    let destructuring = fixture.add_destructuring(&["a", "b"], Ty::class(pair));

    let symbols = SymbolTable::new();
    let (unit, statements) = lower(&fixture, &symbols, &LoweringOptions::default());
    let script = unit.script().unwrap();
    let this_symbol = unit[script.this_receiver.unwrap()].symbol();

    let [IrStatement::Declaration(container), IrStatement::Declaration(first), IrStatement::Declaration(second), block] =
        script.statements.as_slice()
    else {
        panic!("unexpected statements: {:?}", script.statements);
    };

    let container_decl = &unit[*container];
    assert_eq!(container_decl.origin, Origin::TemporaryVariable);
    let variable = container_decl.as_variable().unwrap();
    let pair_ty = IrType::simple(symbols.lookup(SymbolKind::Class, pair).unwrap());
    assert_eq!(variable.ty, pair_ty);
    assert!(!variable.is_var);
    assert_eq!(fixture.interner.resolve(variable.name), "tmp0_container");
    assert_eq!(unit[variable.initializer.unwrap()].ty, pair_ty);

    let properties = [*first, *second];
    for (property, descriptor) in properties.iter().zip(&destructuring.variables) {
        assert_eq!(
            symbols.lookup(SymbolKind::Property, *descriptor),
            Ok(unit[*property].symbol())
        );
        assert_eq!(unit[*property].origin, Origin::Defined);
    }
    assert_eq!(fixture.interner.resolve(unit[*first].name()), "a");
    assert_eq!(fixture.interner.resolve(unit[*second].name()), "b");

    let stores = assignments(&unit, block);
    assert_eq!(stores.len(), 2);
    for (index, (assignment, property)) in stores.iter().zip(properties).enumerate() {
        let IrStatement::Expression(assignment) = assignment else {
            panic!("expected an assignment, got {assignment:?}");
        };
        let IrExprKind::SetField {
            field,
            receiver,
            value,
        } = &unit[*assignment].kind
        else {
            panic!("expected a field store, got {:?}", unit[*assignment].kind);
        };
        let backing = unit[property].as_property().unwrap().backing_field.unwrap();
        assert_eq!(*field, unit[backing].symbol());
        assert_eq!(
            unit[receiver.unwrap()].kind,
            IrExprKind::GetValue {
                symbol: this_symbol
            }
        );

        let IrExprKind::Call {
            callee,
            dispatch_receiver,
            origin,
            ..
        } = &unit[*value].kind
        else {
            panic!("expected a componentN call, got {:?}", unit[*value].kind);
        };
        assert_eq!(*origin, Some(StatementOrigin::ComponentN(index as u32 + 1)));
        assert_eq!(
            symbols.lookup(SymbolKind::Function, destructuring.components[index]),
            Ok(*callee)
        );
        assert_eq!(
            unit[dispatch_receiver.unwrap()].kind,
            IrExprKind::GetValue {
                symbol: container_decl.symbol()
            }
        );
    }

    assert_eq!(statements.calls.len(), 2);
    assert_eq!(statements.expressions, vec![destructuring.initializer]);
}

#[test]
fn test_placeholder_declares_property_without_call() {
    let mut fixture = ScriptFixture::new("skip");
    let pair = fixture.class("Pair");
    let destructuring = fixture.add_destructuring(&["_", "b"], Ty::class(pair));

    let symbols = SymbolTable::new();
    let (unit, statements) = lower(&fixture, &symbols, &LoweringOptions::default());
    let script = unit.script().unwrap();

    let [IrStatement::Declaration(_), IrStatement::Declaration(placeholder), IrStatement::Declaration(used), block] =
        script.statements.as_slice()
    else {
        panic!("unexpected statements: {:?}", script.statements);
    };
    assert_eq!(
        unit[*placeholder].name(),
        fixture.interner.placeholder()
    );
    assert_eq!(
        symbols.lookup(SymbolKind::Property, destructuring.variables[1]),
        Ok(unit[*used].symbol())
    );

    let stores = assignments(&unit, block);
    let [IrStatement::Expression(assignment)] = stores.as_slice() else {
        panic!("expected one assignment");
    };
    let placeholder_field = unit[*placeholder].as_property().unwrap().backing_field.unwrap();
    let IrExprKind::SetField { field, .. } = &unit[*assignment].kind else {
        panic!("expected a field store");
    };
    assert_ne!(*field, unit[placeholder_field].symbol());

    assert_eq!(statements.calls.len(), 1);
    assert_eq!(statements.calls[0].origin, Some(StatementOrigin::ComponentN(2)));
}

#[test]
fn test_placeholder_skipped_when_disabled() {
    let mut fixture = ScriptFixture::new("skip");
    let pair = fixture.class("Pair");
    fixture.add_destructuring(&["_", "b"], Ty::class(pair));

    let options = LoweringOptions {
        declare_placeholder_properties: false,
        ..LoweringOptions::default()
    };
    let (unit, statements) = lower(&fixture, &SymbolTable::new(), &options);
    let script = unit.script().unwrap();

    let [IrStatement::Declaration(_), IrStatement::Declaration(used), block] =
        script.statements.as_slice()
    else {
        panic!("unexpected statements: {:?}", script.statements);
    };
    assert_eq!(fixture.interner.resolve(unit[*used].name()), "b");
    assert_eq!(assignments(&unit, block).len(), 1);
    assert_eq!(statements.calls.len(), 1);
}

#[test]
fn test_all_placeholders_leave_empty_block() {
    let mut fixture = ScriptFixture::new("ignored");
    let pair = fixture.class("Pair");
    fixture.add_destructuring(&["_", "_"], Ty::class(pair));

    let options = LoweringOptions {
        declare_placeholder_properties: false,
        ..LoweringOptions::default()
    };
    let (unit, statements) = lower(&fixture, &SymbolTable::new(), &options);
    let script = unit.script().unwrap();

    let [IrStatement::Declaration(container), block] = script.statements.as_slice() else {
        panic!("unexpected statements: {:?}", script.statements);
    };
    assert_eq!(unit[*container].origin, Origin::TemporaryVariable);
    assert!(assignments(&unit, block).is_empty());
    assert!(statements.calls.is_empty());
}

#[test]
fn test_var_entries_get_setters() {
    let mut fixture = ScriptFixture::new("mutable");
    let pair = fixture.class("Pair");
    fixture.add_destructuring_with(&["x"], Ty::class(pair), true);

    let (unit, _) = lower(&fixture, &SymbolTable::new(), &LoweringOptions::default());
    let script = unit.script().unwrap();
    let IrStatement::Declaration(property) = script.statements[1] else {
        panic!("unexpected statements: {:?}", script.statements);
    };

    let data = unit[property].as_property().unwrap();
    assert!(data.is_var);
    let setter = data.setter.unwrap();
    assert_eq!(fixture.interner.resolve(unit[setter].name()), "<set-x>");
    assert_eq!(unit[setter].as_function().unwrap().value_parameters.len(), 1);
    assert!(!unit[data.backing_field.unwrap()].as_field().unwrap().is_final);
}

#[test]
fn test_temporaries_are_numbered_per_unit() {
    let mut fixture = ScriptFixture::new("twice");
    let pair = fixture.class("Pair");
    fixture.add_destructuring(&["a", "b"], Ty::class(pair));
    fixture.add_destructuring(&["c", "d"], Ty::class(pair));

    let (unit, _) = lower(&fixture, &SymbolTable::new(), &LoweringOptions::default());
    let names: Vec<_> = unit
        .decls()
        .filter(|(_, decl)| decl.origin == Origin::TemporaryVariable)
        .map(|(_, decl)| fixture.interner.resolve(decl.name()).to_owned())
        .collect();
    assert_eq!(names, vec!["tmp0_container", "tmp1_container"]);
}

#[test]
fn test_missing_component_call() {
    let mut fixture = ScriptFixture::new("unresolved");
    let pair = fixture.class("Pair");
    let destructuring = fixture.add_destructuring(&["a"], Ty::class(pair));
    let extra = fixture.tree.alloc_child(
        destructuring.declaration,
        SyntaxKind::DestructuringEntry,
        Span::new(900, 901),
        Some(fixture.interner.intern("z")),
    );
    fixture
        .bindings
        .record_variable(extra, destructuring.variables[0]);

    let error = fixture.lower_default(&SymbolTable::new()).unwrap_err();
    assert_eq!(error, LoweringError::MissingComponentCall { entry: extra });
}

#[test]
fn test_missing_entry_variable() {
    let mut fixture = ScriptFixture::new("unresolved");
    let pair = fixture.class("Pair");
    let destructuring = fixture.add_destructuring(&["a"], Ty::class(pair));
    let extra = fixture.tree.alloc_child(
        destructuring.declaration,
        SyntaxKind::DestructuringEntry,
        Span::new(900, 901),
        None,
    );

    let error = fixture.lower_default(&SymbolTable::new()).unwrap_err();
    assert_eq!(error, LoweringError::MissingEntryVariable { entry: extra });
}

#[test]
fn test_missing_initializer() {
    let mut fixture = ScriptFixture::new("bare");
    let declaration = fixture.tree.alloc_child(
        fixture.node,
        SyntaxKind::DestructuringDeclaration,
        Span::new(900, 910),
        None,
    );

    let error = fixture.lower_default(&SymbolTable::new()).unwrap_err();
    assert_eq!(
        error,
        LoweringError::MissingDestructuringInitializer { node: declaration }
    );
}
