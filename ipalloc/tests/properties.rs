mod common;

use std::collections::BTreeSet;

use common::*;
use ipalloc::{FreeList, IpRange, CHUNK_SIZE};
use proptest::prelude::*;

const BASE: u32 = 0x0a00_0000;
const SPACE: u32 = 2048;

#[derive(Debug, Clone)]
enum Op {
    Add(u32, u32),
    Remove(u32, u32),
    GetIp,
    GetIpChunk,
}

fn arb_span() -> impl Strategy<Value = (u32, u32)> {
    (0..SPACE, 0..64u32).prop_map(|(start, len)| (start, (start + len).min(SPACE - 1)))
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => arb_span().prop_map(|(s, e)| Op::Add(s, e)),
        3 => arb_span().prop_map(|(s, e)| Op::Remove(s, e)),
        2 => Just(Op::GetIp),
        1 => Just(Op::GetIpChunk),
    ]
}

/// A pool of spans, and a hole lying inside one of them.
fn arb_pool_and_hole() -> impl Strategy<Value = (Vec<(u32, u32)>, (u32, u32))> {
    (
        prop::collection::vec(arb_span(), 1..16),
        any::<prop::sample::Index>(),
        any::<prop::sample::Index>(),
        any::<prop::sample::Index>(),
    )
        .prop_map(|(spans, i, a, b)| {
            let (start, end) = spans[i.index(spans.len())];
            let len = (end - start + 1) as usize;
            let x = start + a.index(len) as u32;
            let y = start + b.index(len) as u32;
            (spans, (x.min(y), x.max(y)))
        })
}

fn to_range((start, end): (u32, u32)) -> IpRange {
    IpRange {
        start: v4(BASE + start),
        end: v4(BASE + end),
    }
}

fn to_u32(addr: ipalloc::Address) -> u32 {
    let b = addr.as_bytes();
    u32::from_be_bytes([b[0], b[1], b[2], b[3]]) - BASE
}

fn addresses(ranges: &[IpRange]) -> BTreeSet<u32> {
    ranges
        .iter()
        .flat_map(|r| to_u32(r.start)..=to_u32(r.end))
        .collect()
}

proptest! {
    #[test]
    fn stays_canonical_and_matches_model(ops in prop::collection::vec(arb_op(), 1..64)) {
        let mut free_list = FreeList::new();
        let mut model = BTreeSet::new();
        for op in ops {
            match op {
                Op::Add(s, e) => {
                    let r = to_range((s, e));
                    free_list.add_range(r.start, r.end).unwrap();
                    model.extend(s..=e);
                }
                Op::Remove(s, e) => {
                    let r = to_range((s, e));
                    let changed = free_list.remove_range(r.start, r.end);
                    let hit = model.range(s..=e).next().is_some();
                    prop_assert_eq!(changed, hit);
                    model.retain(|a| *a < s || *a > e);
                }
                Op::GetIp => match model.iter().next().copied() {
                    Some(lowest) => {
                        prop_assert_eq!(to_u32(free_list.get_ip().unwrap()), lowest);
                        model.remove(&lowest);
                    }
                    None => prop_assert!(free_list.get_ip().is_err()),
                },
                Op::GetIpChunk => {
                    let before = model.len() as u64;
                    match free_list.get_ip_chunk() {
                        Ok(chunk) => {
                            let taken = addresses(&chunk);
                            prop_assert!(taken.len() as u64 >= CHUNK_SIZE);
                            prop_assert!(taken.is_subset(&model));
                            // Always taken from the bottom of the pool.
                            let lowest: BTreeSet<u32> =
                                model.iter().copied().take(taken.len()).collect();
                            prop_assert_eq!(&taken, &lowest);
                            model.retain(|a| !taken.contains(a));
                        }
                        Err(_) => prop_assert!(before < CHUNK_SIZE),
                    }
                }
            }
            prop_assert!(free_list.is_canonical());
            prop_assert_eq!(addresses(free_list.ranges()), model.clone());
        }
    }

    #[test]
    fn add_is_idempotent(spans in prop::collection::vec(arb_span(), 1..32)) {
        let mut once = FreeList::new();
        for span in &spans {
            let r = to_range(*span);
            once.add_range(r.start, r.end).unwrap();
        }
        let mut twice = once.clone();
        for span in &spans {
            let r = to_range(*span);
            twice.add_range(r.start, r.end).unwrap();
        }
        prop_assert_eq!(once.ranges(), twice.ranges());
    }

    #[test]
    fn add_order_does_not_matter(
        (spans, shuffled) in prop::collection::vec(arb_span(), 1..32)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let a = ipalloc(&spans.into_iter().map(to_range).collect::<Vec<_>>());
        let b = ipalloc(&shuffled.into_iter().map(to_range).collect::<Vec<_>>());
        prop_assert_eq!(a.free_list(), b.free_list());
    }

    #[test]
    fn remove_then_add_restores((spans, hole) in arb_pool_and_hole()) {
        let pool: Vec<IpRange> = spans.into_iter().map(to_range).collect();
        let hole = to_range(hole);
        let alloc = ipalloc(&pool);
        let before = alloc.free_list();
        prop_assert!(alloc.remove_range(hole.start, hole.end));
        alloc.add_range(hole.start, hole.end).unwrap();
        prop_assert_eq!(alloc.free_list(), before);
    }

    #[test]
    fn add_then_remove_empties(span in arb_span()) {
        let r = to_range(span);
        let alloc = ipalloc(&[r]);
        prop_assert!(alloc.remove_range(r.start, r.end));
        prop_assert!(alloc.is_exhausted());
        prop_assert!(alloc.free_list().is_empty());
    }

    #[test]
    fn get_ip_is_remove_of_lowest(spans in prop::collection::vec(arb_span(), 1..16)) {
        let pool: Vec<IpRange> = spans.into_iter().map(to_range).collect();
        let a = ipalloc(&pool);
        let b = ipalloc(&pool);
        let ip = a.get_ip().unwrap();
        prop_assert!(b.remove_range(ip, ip));
        prop_assert_eq!(a.free_list(), b.free_list());
    }

    #[test]
    fn chunk_is_aligned_and_preserves_union(spans in prop::collection::vec(arb_span(), 1..48)) {
        let pool: Vec<IpRange> = spans.into_iter().map(to_range).collect();
        let alloc = ipalloc(&pool);
        let before_ranges = alloc.free_list();
        let before = addresses(&before_ranges);
        if let Ok(chunk) = alloc.get_ip_chunk() {
            let after_ranges = alloc.free_list();
            let taken = addresses(&chunk);
            let after = addresses(&after_ranges);
            prop_assert!(taken.is_disjoint(&after));
            let union: BTreeSet<u32> = taken.union(&after).copied().collect();
            prop_assert_eq!(union, before);
            // Whatever is left of the range the chunk stopped in starts on a
            // 256-address boundary.
            let last = chunk[chunk.len() - 1];
            let stopped_in = before_ranges.iter().find(|r| r.contains(&last.start)).unwrap();
            if last.end < stopped_in.end {
                let (rest, _) = last.end.increment();
                prop_assert_eq!(rest.low_byte(), 0);
                prop_assert_eq!(after_ranges[0], IpRange { start: rest, end: stopped_in.end });
            }
        } else {
            prop_assert!((before.len() as u64) < CHUNK_SIZE);
        }
    }
}
