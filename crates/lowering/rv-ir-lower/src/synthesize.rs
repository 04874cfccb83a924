//! Value parameters and properties built straight from descriptors
//!
//! Everything here is allocated under the builder's current owner. Symbols of
//! properties and fields are declared in the process-wide table; value
//! parameters are local and go into [`rv_ir::LocalSymbols`].

use crate::{LoweringContext, LoweringError, LoweringResult};
use log::debug;
use rv_descriptors::{Capability, DescriptorId, Modality, Visibility};
use rv_intern::Name;
use rv_ir::{
    DeclId, DeclKind, IrBuilder, IrExprKind, IrField, IrFunction, IrProperty, IrStatement,
    IrType, IrValueParameter, Origin, SymbolId, SymbolKind,
};
use rv_span::Span;

/// `this` receiver parameter of a class or script
///
/// The new parameter becomes the in-scope value for `owner`'s receiver,
/// shadowing any earlier one.
///
/// # Errors
///
/// `owner` has no receiver, or the receiver has no type.
pub fn receiver(
    cx: &mut LoweringContext<'_>,
    builder: &mut IrBuilder,
    owner: DescriptorId,
    origin: Origin,
    span: Span,
) -> LoweringResult<DeclId> {
    let (receiver, parameter) = receiver_parameter(cx, owner)?;
    let symbol = cx.locals.declare_value_parameter(cx.symbols, receiver);
    Ok(builder.alloc_decl(
        symbol,
        origin,
        span,
        DeclKind::ValueParameter(parameter),
    ))
}

/// Rebuild the receiver `decl` of `owner` in place, keeping its symbol
///
/// Expressions already lowered against `decl` stay valid; only the origin
/// and the descriptor-derived data are replaced.
///
/// # Errors
///
/// Same as [`receiver`].
pub fn refresh_receiver(
    cx: &mut LoweringContext<'_>,
    builder: &mut IrBuilder,
    decl: DeclId,
    owner: DescriptorId,
    origin: Origin,
) -> LoweringResult<DeclId> {
    let (receiver, parameter) = receiver_parameter(cx, owner)?;
    let node = builder.decl_mut(decl);
    node.origin = origin;
    node.kind = DeclKind::ValueParameter(parameter);
    let symbol = node.symbol();
    cx.locals.introduce_value_parameter(receiver, symbol);
    Ok(decl)
}

fn receiver_parameter(
    cx: &LoweringContext<'_>,
    owner: DescriptorId,
) -> LoweringResult<(DescriptorId, IrValueParameter)> {
    let receiver = cx
        .descriptor(owner)
        .this_receiver()
        .ok_or(LoweringError::MissingCapability {
            descriptor: owner,
            capability: Capability::Receiver,
        })?;
    let parameter = IrValueParameter {
        name: cx.interner.this_name(),
        ty: cx.type_of(receiver)?,
        index: None,
        vararg_element: None,
        default_value: None,
    };
    Ok((receiver, parameter))
}

/// Value parameter for a parameter descriptor
///
/// # Errors
///
/// [`LoweringError::UnexpectedDescriptor`] if `parameter` is not a value
/// parameter.
pub fn value_parameter(
    cx: &mut LoweringContext<'_>,
    builder: &mut IrBuilder,
    parameter: DescriptorId,
    origin: Origin,
    span: Span,
) -> LoweringResult<DeclId> {
    let descriptor = cx.descriptor(parameter);
    let data = descriptor
        .as_value_parameter()
        .ok_or(LoweringError::UnexpectedDescriptor {
            descriptor: parameter,
            expected: "value parameter",
            found: descriptor.kind_name(),
        })?;
    let ty = cx.translate(&data.ty);
    let vararg_element = data.vararg_element.as_ref().map(|element| cx.translate(element));
    let symbol = cx.locals.declare_value_parameter(cx.symbols, parameter);
    Ok(builder.alloc_decl(
        symbol,
        origin,
        span,
        DeclKind::ValueParameter(IrValueParameter {
            name: descriptor.name,
            ty,
            index: Some(data.index),
            vararg_element,
            default_value: None,
        }),
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accessors {
    GetterOnly,
    FromDescriptor,
}

struct AccessorTarget {
    property: SymbolId,
    field: SymbolId,
    name: Name,
    ty: IrType,
    visibility: Visibility,
    modality: Modality,
    span: Span,
}

/// Property with a backing field and a getter only, whatever the descriptor
/// says about mutability
///
/// Used for script result and provided properties.
///
/// # Errors
///
/// Untyped descriptor, or a symbol already bound.
pub fn getter_only_property(
    cx: &mut LoweringContext<'_>,
    builder: &mut IrBuilder,
    descriptor: DescriptorId,
    origin: Origin,
    span: Span,
    owner_ty: &IrType,
) -> LoweringResult<DeclId> {
    property(cx, builder, descriptor, origin, span, owner_ty, Accessors::GetterOnly)
}

/// Property with a backing field, a getter and, for `var`, a setter
///
/// # Errors
///
/// Untyped descriptor, or a symbol already bound.
pub fn property_from_descriptor(
    cx: &mut LoweringContext<'_>,
    builder: &mut IrBuilder,
    descriptor: DescriptorId,
    origin: Origin,
    span: Span,
    owner_ty: &IrType,
) -> LoweringResult<DeclId> {
    property(cx, builder, descriptor, origin, span, owner_ty, Accessors::FromDescriptor)
}

/// Backing field symbol of a synthesized property
///
/// # Errors
///
/// [`LoweringError::MissingBackingField`] if `property` has none.
pub fn backing_field(builder: &IrBuilder, property: DeclId) -> LoweringResult<SymbolId> {
    let decl = builder.decl(property);
    decl.as_property()
        .and_then(|data| data.backing_field)
        .map(|field| builder.decl(field).symbol())
        .ok_or(LoweringError::MissingBackingField {
            property: decl.symbol(),
        })
}

fn property(
    cx: &mut LoweringContext<'_>,
    builder: &mut IrBuilder,
    descriptor_id: DescriptorId,
    origin: Origin,
    span: Span,
    owner_ty: &IrType,
    accessors: Accessors,
) -> LoweringResult<DeclId> {
    let descriptor = cx.descriptor(descriptor_id);
    let ty = cx.type_of(descriptor_id)?;
    let visibility = descriptor
        .visibility()
        .filter(|visibility| *visibility != Visibility::Local)
        .unwrap_or(Visibility::Public);
    let modality = descriptor.modality().unwrap_or(Modality::Final);
    let is_var = accessors == Accessors::FromDescriptor && descriptor.is_var();

    let property_symbol = cx.symbols.declare(SymbolKind::Property, descriptor_id)?;
    let field_symbol = cx.symbols.declare(SymbolKind::Field, descriptor_id)?;
    let property = builder.alloc_decl(
        property_symbol,
        origin,
        span,
        DeclKind::Property(IrProperty {
            name: descriptor.name,
            visibility,
            modality,
            is_var,
            backing_field: None,
            getter: None,
            setter: None,
        }),
    );
    let field = builder.alloc_decl(
        field_symbol,
        Origin::PropertyBackingField,
        span,
        DeclKind::Field(IrField {
            name: descriptor.name,
            ty: ty.clone(),
            visibility: Visibility::Private,
            is_final: !is_var,
            initializer: None,
            property: Some(property_symbol),
        }),
    );

    let target = AccessorTarget {
        property: property_symbol,
        field: field_symbol,
        name: descriptor.name,
        ty,
        visibility,
        modality,
        span,
    };
    let getter = getter(cx, builder, &target, owner_ty);
    let setter = is_var.then(|| setter(cx, builder, &target, owner_ty));

    if let Some(data) = builder.decl_mut(property).as_property_mut() {
        data.backing_field = Some(field);
        data.getter = Some(getter);
        data.setter = setter;
    }
    debug!(
        "synthesized {origin} property `{}`{}",
        cx.interner.resolve(descriptor.name),
        if is_var { " (var)" } else { "" }
    );
    Ok(property)
}

fn accessor_shell(
    cx: &LoweringContext<'_>,
    builder: &mut IrBuilder,
    target: &AccessorTarget,
    prefix: &str,
    return_type: IrType,
) -> (SymbolId, DeclId) {
    let symbol = cx.symbols.fresh(SymbolKind::Function);
    let name = cx
        .interner
        .intern(&format!("<{prefix}-{}>", cx.interner.resolve(target.name)));
    let accessor = builder.alloc_decl(
        symbol,
        Origin::DefaultPropertyAccessor,
        target.span,
        DeclKind::Function(IrFunction {
            name,
            visibility: target.visibility,
            modality: target.modality,
            return_type,
            dispatch_receiver: None,
            extension_receiver: None,
            value_parameters: Vec::new(),
            type_parameters: Vec::new(),
            body: None,
            property: Some(target.property),
        }),
    );
    (symbol, accessor)
}

fn dispatch_receiver(
    cx: &LoweringContext<'_>,
    builder: &mut IrBuilder,
    owner_ty: &IrType,
    span: Span,
) -> (DeclId, SymbolId) {
    let symbol = cx.symbols.fresh(SymbolKind::ValueParameter);
    let receiver = builder.alloc_decl(
        symbol,
        Origin::InstanceReceiver,
        span,
        DeclKind::ValueParameter(IrValueParameter {
            name: cx.interner.this_name(),
            ty: owner_ty.clone(),
            index: None,
            vararg_element: None,
            default_value: None,
        }),
    );
    (receiver, symbol)
}

fn getter(
    cx: &LoweringContext<'_>,
    builder: &mut IrBuilder,
    target: &AccessorTarget,
    owner_ty: &IrType,
) -> DeclId {
    let (symbol, getter) = accessor_shell(cx, builder, target, "get", target.ty.clone());
    let span = target.span;
    let (receiver, body) = builder.with_owner(getter, |builder| {
        let (receiver, receiver_symbol) = dispatch_receiver(cx, builder, owner_ty, span);
        let this = builder.alloc_expr(
            IrExprKind::GetValue {
                symbol: receiver_symbol,
            },
            owner_ty.clone(),
            span,
        );
        let value = builder.alloc_expr(
            IrExprKind::GetField {
                field: target.field,
                receiver: Some(this),
            },
            target.ty.clone(),
            span,
        );
        let returned = builder.alloc_expr(
            IrExprKind::Return {
                target: symbol,
                value,
            },
            IrType::Unit,
            span,
        );
        let body = builder.alloc_expr(
            IrExprKind::Block {
                statements: vec![IrStatement::Expression(returned)],
                origin: None,
            },
            IrType::Unit,
            span,
        );
        (receiver, body)
    });
    if let Some(function) = builder.decl_mut(getter).as_function_mut() {
        function.dispatch_receiver = Some(receiver);
        function.body = Some(body);
    }
    getter
}

fn setter(
    cx: &LoweringContext<'_>,
    builder: &mut IrBuilder,
    target: &AccessorTarget,
    owner_ty: &IrType,
) -> DeclId {
    let (_, setter) = accessor_shell(cx, builder, target, "set", IrType::Unit);
    let span = target.span;
    let (receiver, parameter, body) = builder.with_owner(setter, |builder| {
        let (receiver, receiver_symbol) = dispatch_receiver(cx, builder, owner_ty, span);
        let parameter_symbol = cx.symbols.fresh(SymbolKind::ValueParameter);
        let parameter = builder.alloc_decl(
            parameter_symbol,
            Origin::Defined,
            span,
            DeclKind::ValueParameter(IrValueParameter {
                name: cx.interner.intern("<set-?>"),
                ty: target.ty.clone(),
                index: Some(0),
                vararg_element: None,
                default_value: None,
            }),
        );
        let this = builder.alloc_expr(
            IrExprKind::GetValue {
                symbol: receiver_symbol,
            },
            owner_ty.clone(),
            span,
        );
        let value = builder.alloc_expr(
            IrExprKind::GetValue {
                symbol: parameter_symbol,
            },
            target.ty.clone(),
            span,
        );
        let store = builder.alloc_expr(
            IrExprKind::SetField {
                field: target.field,
                receiver: Some(this),
                value,
            },
            IrType::Unit,
            span,
        );
        let body = builder.alloc_expr(
            IrExprKind::Block {
                statements: vec![IrStatement::Expression(store)],
                origin: None,
            },
            IrType::Unit,
            span,
        );
        (receiver, parameter, body)
    });
    if let Some(function) = builder.decl_mut(setter).as_function_mut() {
        function.dispatch_receiver = Some(receiver);
        function.value_parameters = vec![parameter];
        function.body = Some(body);
    }
    setter
}
