use common::single_func;
use rda::utils::cfg::CfgRegion;

mod common;

//   bb7     bb0 -----+ <-+
//           / \      |   |
//          /   \     |   |
//   +--> bb1   bb2   |   |
//   |      \   /     |   |
//   |       \ /      |   |
//   |       bb3      |   |
//   |        |       |   |
//   |       bb4 <----+   |
//   |        |           |
//   +------ bb5 ---------+
//            |
//           bb6
const EDGES: [(usize, usize); 10] = [
    (0, 1),
    (0, 2),
    (1, 3),
    (2, 3),
    (3, 4),
    (0, 4),
    (4, 5),
    (5, 0),
    (5, 1),
    (5, 6),
];

#[test]
fn test_cfg_info_0() {
    let (ctx, func, bb) = single_func(8, &EDGES, &[]);
    let cfg_info = func.cfg_info(&ctx);

    assert_eq!(cfg_info.succs(bb[0]).unwrap(), [bb[1], bb[2], bb[4]]);
    assert_eq!(cfg_info.succs(bb[1]).unwrap(), [bb[3]]);
    assert_eq!(cfg_info.succs(bb[2]).unwrap(), [bb[3]]);
    assert_eq!(cfg_info.succs(bb[3]).unwrap(), [bb[4]]);
    assert_eq!(cfg_info.succs(bb[4]).unwrap(), [bb[5]]);
    assert_eq!(cfg_info.succs(bb[5]).unwrap(), [bb[0], bb[1], bb[6]]);
    assert!(cfg_info.succs(bb[6]).unwrap().is_empty());
    // unreachable, but still part of the graph
    assert!(cfg_info.succs(bb[7]).unwrap().is_empty());

    assert_eq!(cfg_info.preds(bb[0]).unwrap(), [bb[5]]);
    assert_eq!(cfg_info.preds(bb[1]).unwrap(), [bb[0], bb[5]]);
    assert_eq!(cfg_info.preds(bb[3]).unwrap(), [bb[1], bb[2]]);
    assert_eq!(cfg_info.preds(bb[4]).unwrap(), [bb[0], bb[3]]);
    assert!(cfg_info.preds(bb[7]).unwrap().is_empty());

    let reachables = cfg_info.reachable_nodes();
    assert_eq!(reachables.len(), 7);
    assert!(!reachables.contains(&bb[7]));

    assert_eq!(cfg_info.nodes(), bb.as_slice());
    assert_eq!(cfg_info.edges().len(), EDGES.len());
    assert_eq!(cfg_info.region(), func);
}

#[test]
fn test_cfg_info_duplicate_succs() {
    // both arms of the branch go to bb1
    let (ctx, func, bb) = single_func(2, &[(0, 1), (0, 1)], &[]);
    let cfg_info = func.cfg_info(&ctx);

    assert_eq!(cfg_info.succs(bb[0]).unwrap(), [bb[1]]);
    assert_eq!(cfg_info.preds(bb[1]).unwrap(), [bb[0]]);
    assert_eq!(cfg_info.edges(), vec![(bb[0], bb[1])]);
}

#[test]
fn test_cfg_info_fallthrough_is_not_an_edge() {
    // bb0 has no terminator and no branch at all
    let mut ctx = rda::ir::Context::new();
    let func = rda::ir::Func::new(&mut ctx, "f");
    let bb0 = rda::ir::Block::new(&mut ctx, "bb0");
    let bb1 = rda::ir::Block::new(&mut ctx, "bb1");
    func.push_block(&mut ctx, bb0);
    func.push_block(&mut ctx, bb1);

    let cfg_info = func.cfg_info(&ctx);
    assert!(cfg_info.succs(bb0).unwrap().is_empty());
    assert!(cfg_info.preds(bb1).unwrap().is_empty());
}
