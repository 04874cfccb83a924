//! Fixtures and test doubles for script lowering tests
//!
//! [`ScriptFixture`] builds a syntax tree and the matching semantic model
//! side by side, the way a front end would hand them to lowering.
//! [`RecordingStatements`] and [`SimpleMembers`] stand in for the real
//! statement and member lowering.

use rv_descriptors::{
    BindingContext, Bindings, ClassDescriptor, ClassKind, Descriptor, DescriptorId,
    DescriptorKind, ExplicitReceiverKind, FunctionDescriptor, Modality, PropertyDescriptor,
    ReceiverParameterDescriptor, ReceiverValue, ResolvedCall, ScriptDescriptor, Ty,
    ValueParameterDescriptor, Visibility,
};
use rv_intern::Interner;
use rv_ir::{
    DeclId, DeclKind, DefaultTypeTranslator, ExprId, IrBuilder, IrConst, IrExprKind, IrFunction,
    IrType, IrUnit, Origin, SymbolKind, SymbolTable,
};
use rv_ir_lower::{
    generate_call, synthesize, LoweringContext, LoweringError, LoweringOptions, LoweringResult,
    MemberLowering, PregeneratedCall, StatementLowering,
};
use rv_span::{FileId, Span};
use rv_syntax::{SyntaxKind, SyntaxNodeId, SyntaxTree};

/// Nodes and descriptors of one destructuring declaration
#[derive(Debug, Clone)]
pub struct Destructuring {
    /// The declaration node
    pub declaration: SyntaxNodeId,
    /// Initializer expression
    pub initializer: SyntaxNodeId,
    /// Entry nodes, in order
    pub entries: Vec<SyntaxNodeId>,
    /// Entry variables, in entry order
    pub variables: Vec<DescriptorId>,
    /// `componentN` functions of the non-placeholder entries
    pub components: Vec<DescriptorId>,
}

/// A script under construction
pub struct ScriptFixture {
    /// Shared with the session under test
    pub interner: Interner,
    /// Script syntax tree
    pub tree: SyntaxTree,
    /// Semantic model of `tree`
    pub bindings: Bindings,
    /// Root script node
    pub node: SyntaxNodeId,
    /// Script descriptor
    pub script: DescriptorId,
    /// Base class of the script
    pub any: DescriptorId,
    next_offset: u32,
}

impl ScriptFixture {
    /// Script `name` in file 0 with a fresh interner
    pub fn new(name: &str) -> Self {
        Self::with_interner(Interner::new(), FileId(0), name)
    }

    /// Script `name` in `file`, sharing `interner`
    pub fn with_interner(interner: Interner, file: FileId, name: &str) -> Self {
        let mut bindings = Bindings::default();
        let any = alloc_class(&mut bindings, &interner, "Any");
        Self::build(interner, file, name, bindings, any)
    }

    /// Next script of a session: same interner and descriptors as
    /// `previous`, new tree
    ///
    /// Descriptor ids of a session must not collide, so later scripts extend
    /// the descriptor store of earlier ones.
    pub fn chained(previous: &Self, file: FileId, name: &str) -> Self {
        let bindings = Bindings::new(previous.bindings.descriptors().clone());
        Self::build(previous.interner.clone(), file, name, bindings, previous.any)
    }

    fn build(
        interner: Interner,
        file: FileId,
        name: &str,
        mut bindings: Bindings,
        any: DescriptorId,
    ) -> Self {
        let mut tree = SyntaxTree::new(file);
        let node = tree.alloc_root(SyntaxKind::Script, Span::new(0, 1000));

        let receiver = alloc_receiver(&mut bindings, &interner);
        let script = bindings.descriptors_mut().alloc(
            Descriptor::new(
                interner.intern(name),
                DescriptorKind::Script(ScriptDescriptor {
                    supertypes: vec![Ty::class(any)],
                    this_receiver: receiver,
                    implicit_receivers: Vec::new(),
                    constructor_parameters: Vec::new(),
                    provided_properties: Vec::new(),
                    result_value: None,
                }),
            )
            .with_span(Span::new(0, 1000)),
        );
        set_receiver_type(&mut bindings, receiver, script);
        bindings.record_declaration(node, script);

        Self {
            interner,
            tree,
            bindings,
            node,
            script,
            any,
            next_offset: 0,
        }
    }

    fn span(&mut self, len: u32) -> Span {
        let start = self.next_offset;
        self.next_offset += len + 1;
        Span::new(start, start + len)
    }

    /// Edit the script descriptor
    pub fn update_script(&mut self, update: impl FnOnce(&mut ScriptDescriptor)) {
        let script = self.script;
        if let DescriptorKind::Script(data) = &mut self.bindings.descriptors_mut().get_mut(script).kind {
            update(data);
        }
    }

    /// Top-level class descriptor with its own receiver
    pub fn class(&mut self, name: &str) -> DescriptorId {
        alloc_class(&mut self.bindings, &self.interner, name)
    }

    fn property_descriptor(&mut self, name: &str, ty: Ty, is_var: bool) -> DescriptorId {
        let script = self.script;
        self.bindings.descriptors_mut().alloc(
            Descriptor::new(
                self.interner.intern(name),
                DescriptorKind::Property(PropertyDescriptor {
                    ty,
                    visibility: Visibility::Public,
                    modality: Modality::Final,
                    is_var,
                    extension_receiver: None,
                    type_parameters: Vec::new(),
                }),
            )
            .with_container(script),
        )
    }

    fn function_descriptor(&mut self, name: &str, return_type: Ty) -> DescriptorId {
        self.bindings.descriptors_mut().alloc(Descriptor::new(
            self.interner.intern(name),
            DescriptorKind::Function(FunctionDescriptor {
                return_type,
                visibility: Visibility::Public,
                modality: Modality::Final,
                extension_receiver: None,
                value_parameters: Vec::new(),
                type_parameters: Vec::new(),
                is_operator: true,
            }),
        ))
    }

    fn expression(&mut self, parent: SyntaxNodeId, kind: SyntaxKind, ty: Ty) -> SyntaxNodeId {
        let span = self.span(4);
        let node = self.tree.alloc_child(parent, kind, span, None);
        self.bindings.record_expression_type(node, ty);
        node
    }

    /// Top-level statement whose body has type `ty`
    pub fn add_initializer(&mut self, ty: Ty) -> SyntaxNodeId {
        let span = self.span(10);
        let initializer = self
            .tree
            .alloc_child(self.node, SyntaxKind::ScriptInitializer, span, None);
        self.expression(initializer, SyntaxKind::Expression, ty)
    }

    /// Top-level statement with no body
    pub fn add_empty_initializer(&mut self) -> SyntaxNodeId {
        let span = self.span(10);
        self.tree
            .alloc_child(self.node, SyntaxKind::ScriptInitializer, span, None)
    }

    /// Top-level statement calling `callee` on an implicit receiver
    pub fn add_implicit_call(&mut self, callee_name: &str, receiver: DescriptorId) -> SyntaxNodeId {
        let span = self.span(10);
        let initializer = self
            .tree
            .alloc_child(self.node, SyntaxKind::ScriptInitializer, span, None);
        let call = self.expression(initializer, SyntaxKind::Call, Ty::class(self.any));
        let callee = self.function_descriptor(callee_name, Ty::class(self.any));
        let result_type = Ty::class(self.any);
        self.bindings.record_call(
            call,
            ResolvedCall {
                callee,
                dispatch_receiver: Some(ReceiverValue::Implicit(receiver)),
                extension_receiver: None,
                explicit_receiver_kind: ExplicitReceiverKind::NoExplicitReceiver,
                value_arguments: Vec::new(),
                type_arguments: Vec::new(),
                result_type,
            },
        );
        call
    }

    /// `val (entries...) = <expression of type initializer_ty>`
    ///
    /// Entries named `_` get a variable but no `componentN` call.
    pub fn add_destructuring(&mut self, entries: &[&str], initializer_ty: Ty) -> Destructuring {
        self.add_destructuring_with(entries, initializer_ty, false)
    }

    /// [`add_destructuring`](Self::add_destructuring) declaring `var` entries
    pub fn add_destructuring_with(
        &mut self,
        entries: &[&str],
        initializer_ty: Ty,
        is_var: bool,
    ) -> Destructuring {
        let span = self.span(20);
        let declaration =
            self.tree
                .alloc_child(self.node, SyntaxKind::DestructuringDeclaration, span, None);
        let mut nodes = Vec::new();
        let mut variables = Vec::new();
        let mut components = Vec::new();
        for (index, name) in entries.iter().enumerate() {
            let entry_span = self.span(1);
            let entry = self.tree.alloc_child(
                declaration,
                SyntaxKind::DestructuringEntry,
                entry_span,
                Some(self.interner.intern(name)),
            );
            let entry_ty = Ty::class(self.any);
            let variable = self.property_descriptor(name, entry_ty.clone(), is_var);
            self.bindings.record_variable(entry, variable);
            if *name != rv_intern::PLACEHOLDER_NAME {
                let callee = self.function_descriptor(&format!("component{}", index + 1), entry_ty.clone());
                self.bindings.record_component_call(
                    entry,
                    ResolvedCall {
                        callee,
                        dispatch_receiver: Some(ReceiverValue::Transient),
                        extension_receiver: None,
                        explicit_receiver_kind: ExplicitReceiverKind::DispatchReceiver,
                        value_arguments: Vec::new(),
                        type_arguments: Vec::new(),
                        result_type: entry_ty,
                    },
                );
                components.push(callee);
            }
            nodes.push(entry);
            variables.push(variable);
        }
        let initializer = self.expression(declaration, SyntaxKind::Call, initializer_ty);
        Destructuring {
            declaration,
            initializer,
            entries: nodes,
            variables,
            components,
        }
    }

    /// Property declaration lowered by [`SimpleMembers`]
    pub fn add_property(&mut self, name: &str, ty: Ty) -> SyntaxNodeId {
        let span = self.span(10);
        let node = self.tree.alloc_child(
            self.node,
            SyntaxKind::Property,
            span,
            Some(self.interner.intern(name)),
        );
        let descriptor = self.property_descriptor(name, ty, false);
        self.bindings.record_declaration(node, descriptor);
        node
    }

    /// Function declaration lowered by [`SimpleMembers`]
    pub fn add_function(&mut self, name: &str, return_type: Ty) -> SyntaxNodeId {
        let span = self.span(10);
        let node = self.tree.alloc_child(
            self.node,
            SyntaxKind::Function,
            span,
            Some(self.interner.intern(name)),
        );
        let descriptor = self.function_descriptor(name, return_type);
        self.bindings.record_declaration(node, descriptor);
        node
    }

    /// Any other top-level declaration
    pub fn add_declaration(&mut self, kind: SyntaxKind, name: &str) -> SyntaxNodeId {
        let span = self.span(10);
        self.tree
            .alloc_child(self.node, kind, span, Some(self.interner.intern(name)))
    }

    /// Result property of type `ty`
    pub fn add_result(&mut self, ty: Ty) -> DescriptorId {
        let result = self.property_descriptor(rv_intern::RESULT_NAME, ty, true);
        self.update_script(|data| data.result_value = Some(result));
        result
    }

    /// Constructor-style script parameter
    pub fn add_call_parameter(&mut self, name: &str, ty: Ty) -> DescriptorId {
        let mut index = 0;
        self.update_script(|data| index = data.constructor_parameters.len() as u32);
        let parameter = self.bindings.descriptors_mut().alloc(Descriptor::new(
            self.interner.intern(name),
            DescriptorKind::ValueParameter(ValueParameterDescriptor {
                ty,
                index,
                vararg_element: None,
                declares_default_value: false,
            }),
        ));
        self.update_script(|data| data.constructor_parameters.push(parameter));
        parameter
    }

    /// Implicit receiver of class `class`
    pub fn add_implicit_receiver(&mut self, class: DescriptorId) {
        self.update_script(|data| data.implicit_receivers.push(class));
    }

    /// Host-provided property
    pub fn add_provided_property(&mut self, name: &str, ty: Ty) -> DescriptorId {
        let property = self.property_descriptor(name, ty, true);
        self.update_script(|data| data.provided_properties.push(property));
        property
    }

    /// Receiver parameter descriptor of the script
    pub fn this_receiver(&self) -> DescriptorId {
        self.bindings
            .descriptor(self.script)
            .this_receiver()
            .unwrap_or(self.script)
    }

    /// Lower the fixture's script into `symbols`
    ///
    /// # Errors
    ///
    /// Whatever [`rv_ir_lower::lower_script`] reports.
    pub fn lower(
        &self,
        symbols: &SymbolTable,
        options: &LoweringOptions,
        statements: &mut RecordingStatements,
        members: &mut SimpleMembers,
    ) -> LoweringResult<IrUnit> {
        let mut cx = LoweringContext::new(
            &self.bindings,
            &self.tree,
            symbols,
            &DefaultTypeTranslator,
            &self.interner,
            options,
        );
        rv_ir_lower::lower_script(&mut cx, self.node, statements, members)
    }

    /// Lower with default options and fresh test doubles
    ///
    /// # Errors
    ///
    /// Whatever [`rv_ir_lower::lower_script`] reports.
    pub fn lower_default(&self, symbols: &SymbolTable) -> LoweringResult<IrUnit> {
        self.lower(
            symbols,
            &LoweringOptions::default(),
            &mut RecordingStatements::default(),
            &mut SimpleMembers::default(),
        )
    }
}

/// Statement lowering that turns every expression into a typed constant
///
/// Expressions with a resolved call are lowered as that call. Every
/// pregenerated call is recorded.
#[derive(Debug, Default)]
pub struct RecordingStatements {
    /// Expressions lowered, in order
    pub expressions: Vec<SyntaxNodeId>,
    /// Calls lowered, in order
    pub calls: Vec<PregeneratedCall>,
}

impl StatementLowering for RecordingStatements {
    fn lower_expression(
        &mut self,
        cx: &mut LoweringContext<'_>,
        builder: &mut IrBuilder,
        expression: SyntaxNodeId,
    ) -> LoweringResult<ExprId> {
        self.expressions.push(expression);
        let bindings = cx.bindings;
        let span = cx.tree.span(expression);
        if let Some(call) = bindings.resolved_call(expression) {
            return self.lower_call(cx, builder, &PregeneratedCall::from_resolved(call), span);
        }
        let ty = bindings
            .expression_type(expression)
            .map_or(IrType::Dynamic, |ty| cx.translate(ty));
        Ok(builder.alloc_expr(IrExprKind::Const(IrConst::Unit), ty, span))
    }

    fn lower_call(
        &mut self,
        cx: &mut LoweringContext<'_>,
        builder: &mut IrBuilder,
        call: &PregeneratedCall,
        span: Span,
    ) -> LoweringResult<ExprId> {
        self.calls.push(call.clone());
        generate_call(self, cx, builder, call, span)
    }
}

/// Member lowering for properties and functions
///
/// Type aliases produce nothing; every other kind is unsupported.
#[derive(Debug, Default)]
pub struct SimpleMembers {
    /// Declarations handed over, in order
    pub lowered: Vec<SyntaxNodeId>,
}

impl MemberLowering for SimpleMembers {
    fn lower_member(
        &mut self,
        cx: &mut LoweringContext<'_>,
        builder: &mut IrBuilder,
        declaration: SyntaxNodeId,
    ) -> LoweringResult<Option<DeclId>> {
        self.lowered.push(declaration);
        let span = cx.tree.span(declaration);
        match cx.tree.kind(declaration) {
            SyntaxKind::Property => {
                let descriptor = cx.declaration_descriptor(declaration)?;
                let owner_ty = owner_type(builder);
                synthesize::property_from_descriptor(
                    cx,
                    builder,
                    descriptor,
                    Origin::Defined,
                    span,
                    &owner_ty,
                )
                .map(Some)
            }
            SyntaxKind::Function => {
                let descriptor_id = cx.declaration_descriptor(declaration)?;
                let descriptor = cx.descriptor(descriptor_id);
                let symbol = cx.symbols.declare(SymbolKind::Function, descriptor_id)?;
                let return_type = cx.type_of(descriptor_id)?;
                Ok(Some(builder.alloc_decl(
                    symbol,
                    Origin::Defined,
                    span,
                    DeclKind::Function(IrFunction {
                        name: descriptor.name,
                        visibility: descriptor.visibility().unwrap_or(Visibility::Public),
                        modality: descriptor.modality().unwrap_or(Modality::Final),
                        return_type,
                        dispatch_receiver: None,
                        extension_receiver: None,
                        value_parameters: Vec::new(),
                        type_parameters: Vec::new(),
                        body: None,
                        property: None,
                    }),
                )))
            }
            SyntaxKind::TypeAlias => Ok(None),
            kind => Err(LoweringError::UnsupportedDeclaration {
                node: declaration,
                kind,
            }),
        }
    }
}

/// Type of the `this` receiver of the script being built
fn owner_type(builder: &IrBuilder) -> IrType {
    builder
        .current_owner()
        .and_then(|owner| builder.decl(owner).as_script())
        .and_then(|script| script.this_receiver)
        .and_then(|receiver| builder.decl(receiver).ty().cloned())
        .unwrap_or(IrType::Error)
}

fn alloc_receiver(bindings: &mut Bindings, interner: &Interner) -> DescriptorId {
    bindings.descriptors_mut().alloc(Descriptor::new(
        interner.this_name(),
        DescriptorKind::ReceiverParameter(ReceiverParameterDescriptor { ty: Ty::Dynamic }),
    ))
}

fn set_receiver_type(bindings: &mut Bindings, receiver: DescriptorId, owner: DescriptorId) {
    if let DescriptorKind::ReceiverParameter(data) = &mut bindings.descriptors_mut().get_mut(receiver).kind {
        data.ty = Ty::class(owner);
    }
}

fn alloc_class(bindings: &mut Bindings, interner: &Interner, name: &str) -> DescriptorId {
    let receiver = alloc_receiver(bindings, interner);
    let class = bindings.descriptors_mut().alloc(Descriptor::new(
        interner.intern(name),
        DescriptorKind::Class(ClassDescriptor {
            kind: ClassKind::Class,
            visibility: Visibility::Public,
            modality: Modality::Final,
            supertypes: Vec::new(),
            this_receiver: receiver,
            type_parameters: Vec::new(),
        }),
    ));
    set_receiver_type(bindings, receiver, class);
    class
}
