use std::collections::BTreeSet;

use common::{build_func, single_func};
use rda::ir::{
    passes::{
        def_catalog::DefId,
        rda::{run_analysis, ReachingDefinitionAnalysis, PARAM_GEN_POLICY, PARAM_SOLVER},
    },
    passman::{LocalPass, ParamStorage},
    Context,
};

mod common;

fn ids(ids: &[usize]) -> BTreeSet<DefId> { ids.iter().copied().map(DefId::new).collect() }

#[test]
fn test_rda_linear() {
    // bb0 -> bb1 -> bb2, defining x, y and z
    let (ctx, func, bb) = single_func(3, &[(0, 1), (1, 2)], &[(0, "x"), (1, "y"), (2, "z")]);
    let result = run_analysis(&ctx, func).unwrap();

    assert_eq!(result.gen(bb[0]), &ids(&[0]));
    assert_eq!(result.gen(bb[1]), &ids(&[1]));
    assert_eq!(result.gen(bb[2]), &ids(&[2]));
    for block in bb.iter() {
        assert!(result.kill(*block).is_empty());
    }

    assert!(result.ins(bb[0]).is_empty());
    assert_eq!(result.outs(bb[0]), &ids(&[0]));
    assert_eq!(result.outs(bb[1]), &ids(&[0, 1]));
    assert_eq!(result.outs(bb[2]), &ids(&[0, 1, 2]));

    assert_eq!(result.doms(bb[0]).unwrap(), &BTreeSet::from([bb[0]]));
    assert_eq!(result.doms(bb[1]).unwrap(), &BTreeSet::from([bb[0], bb[1]]));
    assert_eq!(
        result.doms(bb[2]).unwrap(),
        &BTreeSet::from([bb[0], bb[1], bb[2]])
    );
    assert!(result.natural_loops().is_empty());

    let catalog = result.catalog();
    assert_eq!(catalog.ids().collect::<BTreeSet<_>>(), ids(&[0, 1, 2]));
    assert_eq!(catalog.vars().collect::<Vec<_>>(), vec!["x", "y", "z"]);
    assert_eq!(result.gen_kill().gen(bb[1]), result.gen(bb[1]));
}

#[test]
fn test_rda_self_loop() {
    // bb0 -> bb0, bb0 -> bb1
    let (ctx, func, bb) = single_func(2, &[(0, 0), (0, 1)], &[(0, "x"), (0, "x")]);
    let result = run_analysis(&ctx, func).unwrap();

    let loops = result.natural_loops();
    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].0, (bb[0], bb[0]));
    assert_eq!(loops[0].1, &BTreeSet::from([bb[0]]));

    // both stores of x are generated and flow around the self-edge
    assert_eq!(result.gen(bb[0]), &ids(&[0, 1]));
    assert!(result.kill(bb[0]).is_empty());
    assert_eq!(result.ins(bb[0]), &ids(&[0, 1]));
    assert_eq!(result.ins(bb[1]), &ids(&[0, 1]));
}

#[test]
fn test_rda_diamond() {
    //     bb0
    //    /   \
    //  bb1   bb2
    //    \   /
    //     bb3
    let edges = [(0, 1), (0, 2), (1, 3), (2, 3)];
    let defs = [(0, "x"), (1, "y"), (2, "y")];
    let (ctx, func, bb) = single_func(4, &edges, &defs);
    let result = run_analysis(&ctx, func).unwrap();

    assert_eq!(result.doms(bb[3]).unwrap(), &BTreeSet::from([bb[0], bb[3]]));
    assert!(result.natural_loops().is_empty());

    // both definitions of y may reach bb3
    let y_then = result.def_in("y", bb[1], 0).unwrap();
    let y_else = result.def_in("y", bb[2], 0).unwrap();
    assert!(result.ins(bb[3]).contains(&y_then));
    assert!(result.ins(bb[3]).contains(&y_else));
    assert_eq!(result.ins(bb[3]), &ids(&[0, 1, 2]));

    // each definition of y kills the other
    assert_eq!(result.kill(bb[1]), &BTreeSet::from([y_else]));
    assert_eq!(result.kill(bb[2]), &BTreeSet::from([y_then]));
}

#[test]
fn test_rda_redefinition_in_loop() {
    //  bb0: x
    //   |
    //  bb1 <---.
    //   |      |
    //  bb2: x -'
    //   |
    //  bb3
    let edges = [(0, 1), (1, 2), (2, 1), (2, 3)];
    let (ctx, func, bb) = single_func(4, &edges, &[(0, "x"), (2, "x")]);
    let result = run_analysis(&ctx, func).unwrap();

    assert_eq!(result.ins(bb[1]), &ids(&[0, 1]));
    assert_eq!(result.outs(bb[2]), &ids(&[1]));
    assert_eq!(result.ins(bb[3]), &ids(&[1]));

    let loops = result.natural_loops();
    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].0, (bb[2], bb[1]));
    assert_eq!(loops[0].1, &BTreeSet::from([bb[1], bb[2]]));

    assert_eq!(result.resolve(DefId::new(1)), Some(("x", bb[2])));
    assert_eq!(result.resolve(DefId::new(2)), None);
}

#[test]
fn test_rda_entry_with_predecessor() {
    // the entry is itself a loop header, so definitions flow into it
    let edges = [(0, 1), (1, 0), (1, 2)];
    let (ctx, func, bb) = single_func(3, &edges, &[(0, "i"), (1, "i")]);
    let result = run_analysis(&ctx, func).unwrap();

    assert_eq!(result.ins(bb[0]), &ids(&[1]));
    assert_eq!(result.outs(bb[0]), &ids(&[0]));
    assert_eq!(result.ins(bb[2]), &ids(&[1]));
    assert_eq!(result.doms(bb[0]).unwrap(), &BTreeSet::from([bb[0]]));
}

#[test]
fn test_rda_params() {
    let mut ctx = Context::new();
    let (func, bb) = build_func(&mut ctx, "f", 1, &[], &[(0, "x"), (0, "x")]);

    let mut params = ParamStorage::new();
    params.insert(PARAM_SOLVER, "two-pass");
    params.insert(PARAM_GEN_POLICY, "last-def");

    let mut pass = ReachingDefinitionAnalysis::default();
    pass.fetch_params(&params);
    let result = pass.run(&ctx, func).unwrap();

    assert_eq!(result.gen(bb[0]), &ids(&[1]));
    assert_eq!(result.kill(bb[0]), &ids(&[0]));
    assert_eq!(result.outs(bb[0]), &ids(&[1]));
    assert_eq!(result.reaching().iterations(), 2);
}

#[test]
fn test_rda_unreachable_block() {
    // bb2 is laid out but never reached, its definition goes nowhere
    let edges = [(0, 1), (2, 1)];
    let (ctx, func, bb) = single_func(3, &edges, &[(0, "x"), (2, "x")]);
    let result = run_analysis(&ctx, func).unwrap();

    // may-reach still follows the edge out of the unreachable block
    assert_eq!(result.ins(bb[1]), &ids(&[0, 1]));
    assert!(result.ins(bb[2]).is_empty());
    assert!(!result.dominance().is_reliable(bb[2]));
}
