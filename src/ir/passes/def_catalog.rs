//! # Definition Catalog
//!
//! Numbers every definition of a function with a dense, zero-based ordinal in
//! layout order, and groups the ordinals by the variable they define.
//!
//! Definitions of unnamed temporaries are not catalogued: they neither
//! generate nor kill anything in the reaching definitions analysis.

use std::{collections::BTreeMap, fmt};

use rustc_hash::FxHashMap;

use crate::ir::{Block, Context, Func, Inst};

/// The ordinal of a definition in its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(usize);

impl DefId {
    pub fn new(index: usize) -> Self { DefId(index) }

    pub fn index(self) -> usize { self.0 }
}

impl fmt::Display for DefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// What a definition id stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefInfo {
    /// The name of the defined variable.
    var: String,
    /// The block containing the definition.
    block: Block,
    /// The defining instruction.
    inst: Inst,
}

impl DefInfo {
    pub fn var(&self) -> &str { &self.var }

    pub fn block(&self) -> Block { self.block }

    pub fn inst(&self) -> Inst { self.inst }
}

#[derive(Debug, Default)]
pub struct DefCatalog {
    /// Indexed by [DefId].
    defs: Vec<DefInfo>,
    /// The variable index: the ids of every variable, in increasing order.
    vars: BTreeMap<String, Vec<DefId>>,
    /// The id of each defining instruction.
    inst_ids: FxHashMap<Inst, DefId>,
}

impl DefCatalog {
    pub fn new(ctx: &Context, func: Func) -> Self {
        let mut catalog = DefCatalog::default();

        for block in func.blocks(ctx).iter().copied() {
            for (inst, target) in block.defs(ctx) {
                let Some(var) = target else {
                    continue;
                };
                let id = DefId(catalog.defs.len());
                catalog.defs.push(DefInfo {
                    var: var.to_string(),
                    block,
                    inst,
                });
                catalog.vars.entry(var.to_string()).or_default().push(id);
                catalog.inst_ids.insert(inst, id);
            }
        }

        log::debug!(
            "def_catalog: @{} has {} definitions of {} variables",
            func.name(ctx),
            catalog.defs.len(),
            catalog.vars.len()
        );
        for (var, ids) in catalog.vars.iter() {
            log::trace!("def_catalog: VAR [{}]: {:?}", var, ids);
        }

        catalog
    }

    /// The number of catalogued definitions.
    pub fn len(&self) -> usize { self.defs.len() }

    pub fn is_empty(&self) -> bool { self.defs.is_empty() }

    pub fn def(&self, id: DefId) -> Option<&DefInfo> { self.defs.get(id.0) }

    /// All ids, in increasing order.
    pub fn ids(&self) -> impl Iterator<Item = DefId> { (0..self.defs.len()).map(DefId) }

    /// The ids of all definitions of `var`, empty if the variable is not
    /// defined anywhere in the function.
    pub fn defs_of(&self, var: &str) -> &[DefId] {
        self.vars.get(var).map(|ids| ids.as_slice()).unwrap_or_default()
    }

    /// The defined variables, in lexicographic order.
    pub fn vars(&self) -> impl Iterator<Item = &str> { self.vars.keys().map(|var| var.as_str()) }

    /// The id of a defining instruction, `None` if `inst` is not a
    /// catalogued definition.
    pub fn id_of(&self, inst: Inst) -> Option<DefId> { self.inst_ids.get(&inst).copied() }
}

#[cfg(test)]
mod tests {
    use super::{DefCatalog, DefId};
    use crate::ir::{Block, Context, Func, Inst};

    #[test]
    fn test_def_catalog() {
        let mut ctx = Context::new();
        let func = Func::new(&mut ctx, "f");
        let bb0 = Block::new(&mut ctx, "bb0");
        let bb1 = Block::new(&mut ctx, "bb1");
        func.push_block(&mut ctx, bb0);
        func.push_block(&mut ctx, bb1);

        let x0 = Inst::store(&mut ctx, "x");
        let t0 = Inst::store_temp(&mut ctx, 0);
        let y0 = Inst::store(&mut ctx, "y");
        let x1 = Inst::store(&mut ctx, "x");
        let nop = Inst::other(&mut ctx, "nop");
        bb0.push_inst(&mut ctx, x0);
        bb0.push_inst(&mut ctx, t0);
        bb0.push_inst(&mut ctx, y0);
        bb1.push_inst(&mut ctx, nop);
        bb1.push_inst(&mut ctx, x1);

        let catalog = DefCatalog::new(&ctx, func);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.id_of(x0), Some(DefId::new(0)));
        assert_eq!(catalog.id_of(y0), Some(DefId::new(1)));
        assert_eq!(catalog.id_of(x1), Some(DefId::new(2)));
        assert_eq!(catalog.id_of(t0), None);
        assert_eq!(catalog.id_of(nop), None);

        assert_eq!(catalog.defs_of("x"), &[DefId::new(0), DefId::new(2)]);
        assert_eq!(catalog.defs_of("y"), &[DefId::new(1)]);
        assert!(catalog.defs_of("z").is_empty());
        assert_eq!(catalog.vars().collect::<Vec<_>>(), vec!["x", "y"]);

        let info = catalog.def(DefId::new(2)).unwrap();
        assert_eq!(info.var(), "x");
        assert_eq!(info.block(), bb1);
        assert_eq!(info.inst(), x1);
    }
}
