#![allow(dead_code)]

use rda::ir::{Block, Context, Func, Inst};

/// Build a function with `n` blocks named `bb0`..`bb{n-1}`, laid out in that
/// order.
///
/// `defs` lists `(block, var)` stores, appended in the given order. Each
/// block then ends with one terminator reaching its successors from `edges`:
/// `ret`, `jump`, `br` or `switch` depending on how many there are.
pub fn build_func(
    ctx: &mut Context,
    name: &str,
    n: usize,
    edges: &[(usize, usize)],
    defs: &[(usize, &str)],
) -> (Func, Vec<Block>) {
    let func = Func::new(ctx, name);
    let blocks: Vec<Block> = (0..n)
        .map(|i| Block::new(ctx, format!("bb{}", i)))
        .collect();
    for block in blocks.iter() {
        func.push_block(ctx, *block);
    }

    for (block, var) in defs {
        let store = Inst::store(ctx, *var);
        blocks[*block].push_inst(ctx, store);
    }

    for (i, block) in blocks.iter().enumerate() {
        let succs: Vec<Block> = edges
            .iter()
            .filter(|(src, _)| *src == i)
            .map(|(_, dst)| blocks[*dst])
            .collect();
        let term = match succs.as_slice() {
            [] => Inst::ret(ctx),
            [dst] => Inst::jump(ctx, *dst),
            [then_dst, else_dst] => Inst::branch(ctx, *then_dst, *else_dst),
            [default, cases @ ..] => Inst::switch(ctx, *default, cases.to_vec()),
        };
        block.push_inst(ctx, term);
    }

    (func, blocks)
}

/// Shorthand for a fresh context holding one function named `f`.
pub fn single_func(
    n: usize,
    edges: &[(usize, usize)],
    defs: &[(usize, &str)],
) -> (Context, Func, Vec<Block>) {
    let mut ctx = Context::new();
    let (func, blocks) = build_func(&mut ctx, "f", n, edges, defs);
    (ctx, func, blocks)
}
