//! Lowering driver
//!
//! A [`LoweringSession`] owns what outlives a single script: the interner,
//! the process-wide symbol table and the lowered units. Scripts lowered in
//! one session see the receivers of the scripts lowered before them, which
//! is how a REPL chains its snippets.

use anyhow::{Context, Result};
use log::info;
use rv_descriptors::BindingContext;
use rv_intern::Interner;
use rv_ir::{DefaultTypeTranslator, IrUnit, SymbolTable};
use rv_ir_lower::{LoweringContext, LoweringOptions, MemberLowering, StatementLowering};
use rv_scope::{DelegatedMemberScope, MemberScope};
use rv_syntax::SyntaxTree;
use std::path::Path;

/// State shared by every script of a compilation or REPL session
pub struct LoweringSession {
    interner: Interner,
    symbols: SymbolTable,
    options: LoweringOptions,
    types: DefaultTypeTranslator,
    units: Vec<IrUnit>,
}

impl LoweringSession {
    /// Empty session using `options`
    pub fn new(interner: Interner, options: LoweringOptions) -> Self {
        Self {
            interner,
            symbols: SymbolTable::new(),
            options,
            types: DefaultTypeTranslator,
            units: Vec::new(),
        }
    }

    /// Session configured from TOML text (see [`LoweringOptions`])
    ///
    /// # Errors
    ///
    /// Invalid configuration.
    pub fn from_config_str(interner: Interner, config: &str) -> Result<Self> {
        let options =
            LoweringOptions::from_toml_str(config).context("invalid lowering configuration")?;
        Ok(Self::new(interner, options))
    }

    /// Session configured from a TOML file
    ///
    /// # Errors
    ///
    /// Unreadable file or invalid configuration.
    pub fn from_config_file(interner: Interner, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_config_str(interner, &config)
            .with_context(|| format!("in configuration file {}", path.display()))
    }

    /// Interner of the session
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Process-wide symbol table of the session
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Options of the session
    pub fn options(&self) -> &LoweringOptions {
        &self.options
    }

    /// Units lowered so far, in order
    pub fn units(&self) -> &[IrUnit] {
        &self.units
    }

    /// Lower the script at the root of `tree`
    ///
    /// # Errors
    ///
    /// Every lowering failure is an internal compiler error; nothing of the
    /// failed script is published.
    pub fn lower_script(
        &mut self,
        bindings: &dyn BindingContext,
        tree: &SyntaxTree,
        statements: &mut dyn StatementLowering,
        members: &mut dyn MemberLowering,
    ) -> Result<&IrUnit> {
        let script = tree
            .root()
            .with_context(|| format!("internal compiler error: empty syntax tree for {:?}", tree.file()))?;
        let mut cx = LoweringContext::new(
            bindings,
            tree,
            &self.symbols,
            &self.types,
            &self.interner,
            &self.options,
        );
        let unit = rv_ir_lower::lower_script(&mut cx, script, statements, members)
            .with_context(|| {
                let location = tree.file_span(script);
                format!(
                    "internal compiler error while lowering script in {:?} at {:?}",
                    location.file,
                    location.range()
                )
            })?;
        info!(
            "lowered {:?}: {} declarations",
            tree.file(),
            unit.decl_count()
        );

        let index = self.units.len();
        self.units.push(unit);
        Ok(&self.units[index])
    }

    /// `use_site` seen through a delegate, minting symbols in this session
    pub fn delegated_scope<'s>(&'s self, use_site: &'s dyn MemberScope) -> DelegatedMemberScope<'s> {
        DelegatedMemberScope::new(use_site, &self.symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_carry_context() {
        let error = LoweringSession::from_config_str(Interner::new(), "[lowering]\nbogus = 1\n")
            .err()
            .map(|error| error.to_string());
        assert_eq!(error.as_deref(), Some("invalid lowering configuration"));
    }

    #[test]
    fn test_missing_config_file() {
        let result = LoweringSession::from_config_file(Interner::new(), "/nonexistent/raven.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_options() {
        let session = LoweringSession::new(Interner::new(), LoweringOptions::default());
        assert!(session.options().declare_placeholder_properties);
        assert!(session.units().is_empty());
        assert!(session.symbols().is_empty());
    }
}
