//! Sessions: REPL chaining, failure handling and concurrent lowering

use lowering_tests::{RecordingStatements, ScriptFixture, SimpleMembers};
use rv_descriptors::Ty;
use rv_driver::LoweringSession;
use rv_intern::Interner;
use rv_ir::{IrExprKind, IrStatement, Parent, SymbolKind, SymbolTable};
use rv_ir_lower::{LoweringError, LoweringOptions};
use rv_span::FileId;
use std::thread;

fn lower_in(session: &mut LoweringSession, fixture: &ScriptFixture) -> anyhow::Result<()> {
    session.lower_script(
        &fixture.bindings,
        &fixture.tree,
        &mut RecordingStatements::default(),
        &mut SimpleMembers::default(),
    )?;
    Ok(())
}

#[test]
fn test_repl_snippets_see_earlier_receivers() {
    let interner = Interner::new();
    let mut session = LoweringSession::new(interner.clone(), LoweringOptions::default());

    let mut first = ScriptFixture::with_interner(interner, FileId(0), "Line_1");
    first.add_initializer(Ty::class(first.any));
    lower_in(&mut session, &first).unwrap();

    let mut second = ScriptFixture::chained(&first, FileId(1), "Line_2");
    second.add_implicit_call("show", first.this_receiver());
    lower_in(&mut session, &second).unwrap();

    let [first_unit, second_unit] = session.units() else {
        panic!("expected two units");
    };
    let first_script = first_unit.script().unwrap();
    let first_symbol = first_unit[first_unit.root()].symbol();
    let first_this = first_unit[first_script.this_receiver.unwrap()].symbol();
    assert!(first_script.earlier_scripts.is_empty());

    let script = second_unit.script().unwrap();
    assert_eq!(script.earlier_scripts, vec![first_symbol]);
    let [IrStatement::Expression(call)] = script.statements.as_slice() else {
        panic!("unexpected statements: {:?}", script.statements);
    };
    let IrExprKind::Call {
        dispatch_receiver, ..
    } = &second_unit[*call].kind
    else {
        panic!("expected a call, got {:?}", second_unit[*call].kind);
    };
    assert_eq!(
        second_unit[dispatch_receiver.unwrap()].kind,
        IrExprKind::GetValue { symbol: first_this }
    );

    let scripts = session.symbols().scripts();
    assert_eq!(scripts.len(), 2);
    assert_eq!(scripts[0].symbol, first_symbol);
    assert_eq!(scripts[0].this_receiver, first_this);
}

#[test]
fn test_unshared_receivers_fail_without_publishing() {
    let interner = Interner::new();
    let options = LoweringOptions {
        share_earlier_script_receivers: false,
        ..LoweringOptions::default()
    };
    let mut session = LoweringSession::new(interner.clone(), options);

    let first = ScriptFixture::with_interner(interner, FileId(0), "Line_1");
    lower_in(&mut session, &first).unwrap();

    let mut second = ScriptFixture::chained(&first, FileId(1), "Line_2");
    second.add_implicit_call("show", first.this_receiver());
    let error = lower_in(&mut session, &second).unwrap_err();

    assert!(error.to_string().starts_with("internal compiler error"));
    assert_eq!(
        error.downcast_ref::<LoweringError>(),
        Some(&LoweringError::UnresolvedReceiver {
            receiver: first.this_receiver()
        })
    );
    assert_eq!(session.units().len(), 1);
    assert_eq!(session.symbols().scripts().len(), 1);
    let failed = session
        .symbols()
        .lookup(SymbolKind::Script, second.script)
        .unwrap();
    assert!(!session.symbols().is_bound(failed));
}

#[test]
fn test_session_from_config() {
    let session = LoweringSession::from_config_str(
        Interner::new(),
        "[lowering]\ndeclare_placeholder_properties = false\n",
    )
    .unwrap();
    assert!(!session.options().declare_placeholder_properties);
    assert!(session.options().share_earlier_script_receivers);
}

#[test]
fn test_scripts_lower_concurrently() {
    let interner = Interner::new();
    let mut first = ScriptFixture::with_interner(interner, FileId(0), "Left");
    first.add_property("x", Ty::class(first.any));
    let mut second = ScriptFixture::chained(&first, FileId(1), "Right");
    second.add_property("y", Ty::class(second.any));

    let symbols = SymbolTable::new();
    let (left, right) = thread::scope(|scope| {
        let left = scope.spawn(|| first.lower_default(&symbols));
        let right = scope.spawn(|| second.lower_default(&symbols));
        (left.join().unwrap(), right.join().unwrap())
    });
    let (left, right) = (left.unwrap(), right.unwrap());

    assert_ne!(left.id(), right.id());
    assert_eq!(left[left.root()].parent(), Parent::File(FileId(0)));
    assert_eq!(right[right.root()].parent(), Parent::File(FileId(1)));
    for unit in [&left, &right] {
        for (decl, data) in unit.decls() {
            let owner = symbols.owner(data.symbol()).unwrap();
            assert_eq!(owner.unit, unit.id());
            assert_eq!(owner.decl, decl);
        }
    }
    assert_eq!(symbols.scripts().len(), 2);
}
