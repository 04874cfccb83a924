//! Syntax + semantic model → IR lowering for scripts
//!
//! [`lower_script`] turns one script syntax tree into a published
//! [`rv_ir::IrUnit`]. Statements and ordinary members are lowered by the
//! caller-supplied [`StatementLowering`] and [`MemberLowering`]; this crate
//! owns the script shape: receivers, base class, destructuring, result and
//! provided properties.

mod call;
mod context;
mod error;
mod hooks;
mod options;
mod script;
/// Receivers, parameters and properties built from descriptors
pub mod synthesize;

pub use call::{generate_call, CallReceiver, PregeneratedCall};
pub use context::LoweringContext;
pub use error::{LoweringError, LoweringResult};
pub use hooks::{MemberLowering, StatementLowering};
pub use options::LoweringOptions;
pub use script::lower_script;
