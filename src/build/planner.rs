//! Build graph planning.
//!
//! Runs discovery for every asset family and hands the registries to the
//! assembler. The three family pipelines share nothing until assembly, so
//! they run concurrently.

use crate::build::{
    assemble, match_paths, AssembleInput, AssetFamily, BuildContext, BuildGraph, EntryRegistry,
    GraphError,
};
use tracing::debug;

/// Entry registries of all three families.
#[derive(Debug, Clone)]
pub struct Discovered {
    pub templates: EntryRegistry,
    pub styles: EntryRegistry,
    pub scripts: EntryRegistry,
}

impl Discovered {
    /// Registry of one family.
    pub fn registry(&self, family: AssetFamily) -> &EntryRegistry {
        match family {
            AssetFamily::Template => &self.templates,
            AssetFamily::Stylesheet => &self.styles,
            AssetFamily::Script => &self.scripts,
        }
    }

    /// Total number of discovered entries.
    pub fn len(&self) -> usize {
        self.templates.len() + self.styles.len() + self.scripts.len()
    }

    /// Check if nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Discover and register the entries of one family.
pub fn discover_family(
    ctx: &BuildContext,
    family: AssetFamily,
) -> Result<EntryRegistry, GraphError> {
    let root = ctx.family_root(family);
    let rule = ctx.rule(family);
    debug!(
        %family,
        root = %root.display(),
        include = ?rule.include,
        exclude = ?rule.exclude,
        "discovering entries"
    );

    let paths = match_paths(&root, &rule)?;
    EntryRegistry::build(family, paths, &root)
}

/// Discover the entries of all families.
///
/// Fails with the first error of any family; no partial result is returned.
pub fn discover(ctx: &BuildContext) -> Result<Discovered, GraphError> {
    let (templates, (styles, scripts)) = rayon::join(
        || discover_family(ctx, AssetFamily::Template),
        || {
            rayon::join(
                || discover_family(ctx, AssetFamily::Stylesheet),
                || discover_family(ctx, AssetFamily::Script),
            )
        },
    );

    Ok(Discovered { templates: templates?, styles: styles?, scripts: scripts? })
}

/// Discover all entries and assemble the build graph.
///
/// Applies the context's target filter, if any, after assembly.
pub fn plan(ctx: &BuildContext) -> Result<BuildGraph, GraphError> {
    let Discovered { templates, styles, scripts } = discover(ctx)?;

    let graph = assemble(AssembleInput {
        templates,
        styles,
        scripts,
        mode: ctx.mode(),
        settings: ctx.graph_settings(),
    })?;

    Ok(match ctx.target_filter() {
        Some(filter) => graph.filter(filter),
        None => graph,
    })
}
