//! Script lowering
//!
//! A script becomes one IR script declaration holding, in order: its `this`
//! receiver, implicit receivers, base class, the lowered body, the result
//! property, explicit call parameters, implicit receiver parameters and
//! provided properties. Destructuring declarations at script level become
//! properties assigned from a temporary.

use crate::synthesize::{self, backing_field};
use crate::{
    CallReceiver, LoweringContext, LoweringError, LoweringResult, MemberLowering,
    PregeneratedCall, StatementLowering,
};
use log::{debug, trace};
use rv_descriptors::{DescriptorId, ScriptDescriptor};
use rv_ir::{
    DeclId, DeclKind, IrBuilder, IrExprKind, IrScript, IrStatement, IrType, IrUnit, IrVariable,
    Origin, ScriptRecord, StatementOrigin, SymbolId, SymbolKind,
};
use rv_span::Span;
use rv_syntax::{SyntaxKind, SyntaxNodeId};

/// Lower the script rooted at `script` and publish it
///
/// Symbols of the new unit are bound only if every step succeeds. On success
/// the script is recorded in the symbol table so later scripts of the session
/// can see its receiver.
///
/// # Errors
///
/// Any [`LoweringError`]; all of them are internal compiler errors.
pub fn lower_script(
    cx: &mut LoweringContext<'_>,
    script: SyntaxNodeId,
    statements: &mut dyn StatementLowering,
    members: &mut dyn MemberLowering,
) -> LoweringResult<IrUnit> {
    let descriptor_id = cx.declaration_descriptor(script)?;
    let descriptor = cx.descriptor(descriptor_id);
    let data = descriptor
        .as_script()
        .ok_or(LoweringError::UnexpectedDescriptor {
            descriptor: descriptor_id,
            expected: "script",
            found: descriptor.kind_name(),
        })?;
    let span = cx.tree.span(script);
    debug!("lowering script `{}`", cx.interner.resolve(descriptor.name));

    let earlier = if cx.options.share_earlier_script_receivers {
        cx.symbols.scripts()
    } else {
        Vec::new()
    };

    let symbol = cx.symbols.declare(SymbolKind::Script, descriptor_id)?;
    let mut builder = IrBuilder::new(cx.symbols.new_unit(), cx.tree.file());
    let root = builder.alloc_root(
        symbol,
        Origin::Defined,
        span,
        DeclKind::Script(IrScript::new(descriptor.name)),
    );

    cx.locals.enter_scope();
    for record in &earlier {
        cx.locals
            .introduce_value_parameter(record.this_receiver_descriptor, record.this_receiver);
    }
    let mut lowering = ScriptLowering {
        statements,
        members,
        script: data,
        descriptor: descriptor_id,
        node: script,
        span,
    };
    let lowered = builder.with_owner(root, |builder| lowering.lower(cx, builder, root));
    cx.locals.leave_scope();
    let this_receiver = lowered?;

    if let Some(shell) = builder.script_mut(root) {
        shell.earlier_scripts = earlier.iter().map(|record| record.symbol).collect();
    }
    let unit = builder.publish(cx.symbols)?;
    cx.symbols.register_script(ScriptRecord {
        descriptor: descriptor_id,
        symbol,
        this_receiver_descriptor: data.this_receiver,
        this_receiver,
    });
    debug!(
        "lowered script `{}` into {:?}",
        cx.interner.resolve(descriptor.name),
        unit.id()
    );
    Ok(unit)
}

struct ScriptLowering<'l, 'd, S: ?Sized, M: ?Sized> {
    statements: &'l mut S,
    members: &'l mut M,
    script: &'d ScriptDescriptor,
    descriptor: DescriptorId,
    node: SyntaxNodeId,
    span: Span,
}

impl<S, M> ScriptLowering<'_, '_, S, M>
where
    S: StatementLowering + ?Sized,
    M: MemberLowering + ?Sized,
{
    /// Fill the script shell; returns the symbol of the `this` receiver
    fn lower(
        &mut self,
        cx: &mut LoweringContext<'_>,
        builder: &mut IrBuilder,
        root: DeclId,
    ) -> LoweringResult<SymbolId> {
        let this_receiver = synthesize::receiver(
            cx,
            builder,
            self.descriptor,
            Origin::InstanceReceiver,
            self.span,
        )?;
        let this_symbol = builder.decl(this_receiver).symbol();
        let this_ty = cx.type_of(self.script.this_receiver)?;
        let implicit_receivers = self
            .script
            .implicit_receivers
            .iter()
            .map(|class| {
                synthesize::receiver(cx, builder, *class, Origin::InstanceReceiver, self.span)
            })
            .collect::<LoweringResult<Vec<_>>>()?;

        let base_class = match self.script.supertypes.as_slice() {
            [supertype] => cx.translate(supertype),
            others => {
                return Err(LoweringError::SupertypeCount {
                    script: self.descriptor,
                    found: others.len(),
                });
            }
        };
        if let Some(shell) = builder.script_mut(root) {
            shell.this_receiver = Some(this_receiver);
            shell.implicit_receivers.clone_from(&implicit_receivers);
            shell.base_class = Some(base_class);
        }

        let mut body = Vec::new();
        let tree = cx.tree;
        for declaration in tree.declarations(self.node) {
            match tree.kind(declaration) {
                SyntaxKind::ScriptInitializer => {
                    let expression = tree.initializer_body(declaration).ok_or(
                        LoweringError::MissingInitializerBody { node: declaration },
                    )?;
                    let lowered = self.statements.lower_expression(cx, builder, expression)?;
                    body.push(IrStatement::Expression(lowered));
                }
                SyntaxKind::DestructuringDeclaration => {
                    self.lower_destructuring(
                        cx,
                        builder,
                        declaration,
                        (this_symbol, &this_ty),
                        &mut body,
                    )?;
                }
                kind => {
                    let member = self.members.lower_member(cx, builder, declaration)?.ok_or(
                        LoweringError::NoDeclarationProduced {
                            node: declaration,
                            kind,
                        },
                    )?;
                    body.push(IrStatement::Declaration(member));
                }
            }
        }

        let mut result_property = None;
        if let Some(result) = self.script.result_value {
            let property = synthesize::getter_only_property(
                cx,
                builder,
                result,
                Origin::ScriptResultProperty,
                self.span,
                &this_ty,
            )?;
            result_property = Some(builder.decl(property).symbol());
            body.push(IrStatement::Declaration(property));
        }

        let explicit_call_parameters = self
            .script
            .constructor_parameters
            .iter()
            .map(|parameter| {
                synthesize::value_parameter(
                    cx,
                    builder,
                    *parameter,
                    Origin::ScriptCallParameter,
                    self.span,
                )
            })
            .collect::<LoweringResult<Vec<_>>>()?;

        let implicit_receivers = implicit_receivers
            .into_iter()
            .zip(&self.script.implicit_receivers)
            .map(|(decl, class)| {
                synthesize::refresh_receiver(
                    cx,
                    builder,
                    decl,
                    *class,
                    Origin::ScriptImplicitReceiver,
                )
            })
            .collect::<LoweringResult<Vec<_>>>()?;

        let mut provided_properties = Vec::with_capacity(self.script.provided_properties.len());
        for provided in &self.script.provided_properties {
            let property = synthesize::getter_only_property(
                cx,
                builder,
                *provided,
                Origin::ScriptProvidedProperty,
                self.span,
                &this_ty,
            )?;
            provided_properties.push(builder.decl(property).symbol());
            body.push(IrStatement::Declaration(property));
        }

        if let Some(shell) = builder.script_mut(root) {
            shell.statements = body;
            shell.result_property = result_property;
            shell.explicit_call_parameters = explicit_call_parameters;
            shell.implicit_receivers = implicit_receivers;
            shell.provided_properties = provided_properties;
        }
        Ok(this_symbol)
    }

    /// `val (a, _, c) = init` at script level
    ///
    /// Emits the temporary holding `init`, then one property per entry in
    /// entry order, then a single block assigning every non-placeholder
    /// property from its `componentN` call on the temporary.
    fn lower_destructuring(
        &mut self,
        cx: &mut LoweringContext<'_>,
        builder: &mut IrBuilder,
        declaration: SyntaxNodeId,
        (this_symbol, this_ty): (SymbolId, &IrType),
        body: &mut Vec<IrStatement>,
    ) -> LoweringResult<()> {
        let tree = cx.tree;
        let bindings = cx.bindings;
        let initializer = tree
            .destructuring_initializer(declaration)
            .ok_or(LoweringError::MissingDestructuringInitializer { node: declaration })?;
        let value = self.statements.lower_expression(cx, builder, initializer)?;
        let container_ty = builder.expr(value).ty.clone();
        let container_symbol = cx.symbols.fresh(SymbolKind::Variable);
        let container = builder.alloc_decl(
            container_symbol,
            Origin::TemporaryVariable,
            tree.span(initializer),
            DeclKind::Variable(IrVariable {
                name: cx.temporary_name("container"),
                ty: container_ty.clone(),
                is_var: false,
                initializer: Some(value),
            }),
        );
        body.push(IrStatement::Declaration(container));

        let mut assignments = Vec::new();
        for (index, entry) in tree.destructuring_entries(declaration).enumerate() {
            let entry_span = tree.span(entry);
            let variable = bindings
                .variable(entry)
                .ok_or(LoweringError::MissingEntryVariable { entry })?;

            if cx.interner.is_placeholder(cx.descriptor(variable).name) {
                trace!("placeholder entry {index} of {declaration:?}");
                if cx.options.declare_placeholder_properties {
                    let property = synthesize::property_from_descriptor(
                        cx,
                        builder,
                        variable,
                        Origin::Defined,
                        entry_span,
                        this_ty,
                    )?;
                    body.push(IrStatement::Declaration(property));
                }
                continue;
            }

            let resolved = bindings
                .component_call(entry)
                .ok_or(LoweringError::MissingComponentCall { entry })?;
            let mut call = PregeneratedCall::from_resolved(resolved);
            call.set_explicit_receiver(CallReceiver::Value {
                symbol: container_symbol,
                ty: container_ty.clone(),
            });
            call.origin = Some(StatementOrigin::ComponentN(index as u32 + 1));
            let component = self.statements.lower_call(cx, builder, &call, entry_span)?;

            let property = synthesize::property_from_descriptor(
                cx,
                builder,
                variable,
                Origin::Defined,
                entry_span,
                this_ty,
            )?;
            let field = backing_field(builder, property)?;
            body.push(IrStatement::Declaration(property));

            let receiver = builder.alloc_expr(
                IrExprKind::GetValue {
                    symbol: this_symbol,
                },
                this_ty.clone(),
                entry_span,
            );
            let assignment = builder.alloc_expr(
                IrExprKind::SetField {
                    field,
                    receiver: Some(receiver),
                    value: component,
                },
                IrType::Unit,
                entry_span,
            );
            assignments.push(IrStatement::Expression(assignment));
        }

        let block = builder.alloc_expr(
            IrExprKind::Block {
                statements: assignments,
                origin: Some(StatementOrigin::DestructuringDeclaration),
            },
            IrType::Unit,
            tree.span(declaration),
        );
        body.push(IrStatement::Expression(block));
        Ok(())
    }
}
