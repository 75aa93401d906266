use arbitrary::Unstructured;
use arbtest::{arbitrary, arbtest};
use bitmapped_trie::{Const, Trie, ValidBranchingConstant};

#[derive(arbitrary::Arbitrary, Debug)]
enum Op {
    Append(u32),
    Prepend(u32),
    Update(usize, u32),
    Drop(usize),
    Take(usize),
    Slice(usize, usize),
    Extend(Vec<u32>),
    // Remember the current version, to check later that nothing touched it.
    Snapshot,
}

impl Op {
    fn apply_to_vec(&self, vec: &mut Vec<u32>) {
        match self {
            Op::Append(x) => vec.push(*x),
            Op::Prepend(x) => vec.insert(0, *x),
            Op::Update(idx, x) => {
                if let Some(place) = vec.get_mut(*idx) {
                    *place = *x;
                }
            }
            Op::Drop(n) => {
                vec.drain(..(*n).min(vec.len()));
            }
            Op::Take(n) => vec.truncate(*n),
            Op::Slice(from, to) => {
                vec.truncate(*to);
                vec.drain(..(*from).min(vec.len()));
            }
            Op::Extend(xs) => vec.extend_from_slice(xs),
            Op::Snapshot => {}
        }
    }

    fn apply_to_trie<const N: usize>(&self, trie: &Trie<u32, N>) -> Trie<u32, N>
    where
        Const<N>: ValidBranchingConstant,
    {
        match self {
            Op::Append(x) => trie.append(*x),
            Op::Prepend(x) => trie.prepend(*x),
            Op::Update(idx, x) => match trie.update(*idx, *x) {
                Ok(updated) => updated,
                Err(_) => {
                    assert!(*idx >= trie.len());
                    trie.clone()
                }
            },
            Op::Drop(n) => trie.drop(*n),
            Op::Take(n) => trie.take(*n),
            Op::Slice(from, to) => trie.slice(*from, *to),
            Op::Extend(xs) => {
                let mut ret = trie.clone();
                ret.extend(xs.iter().copied());
                ret
            }
            Op::Snapshot => trie.clone(),
        }
    }
}

// u.arbitrary() generates very short vecs by default:
// https://github.com/matklad/arbtest/issues/8
fn arb_vec(u: &mut Unstructured<'_>) -> arbitrary::Result<Vec<u32>> {
    let len = u.arbitrary_len::<u32>()?;
    std::iter::from_fn(|| Some(u.arbitrary::<u32>()))
        .take(len)
        .collect()
}

// Keep the counts in the interesting range, relative to the lengths we get.
fn arb_op(u: &mut Unstructured<'_>) -> arbitrary::Result<Op> {
    Ok(match u.arbitrary::<Op>()? {
        Op::Update(idx, x) => Op::Update(idx % 300, x),
        Op::Drop(n) => Op::Drop(n % 300),
        Op::Take(n) => Op::Take(n % 300),
        Op::Slice(from, to) => Op::Slice(from % 300, to % 300),
        op => op,
    })
}

fn check_ops<const N: usize>(u: &mut Unstructured<'_>) -> arbitrary::Result<()>
where
    Const<N>: ValidBranchingConstant,
{
    let mut vec: Vec<u32> = arb_vec(u)?;
    let mut trie: Trie<u32, N> = vec.iter().copied().collect();
    let mut snapshots: Vec<(Vec<u32>, Trie<u32, N>)> = Vec::new();
    let num_ops = u.arbitrary_len::<Op>()?;

    for _ in 0..num_ops {
        let op = arb_op(u)?;
        if let Op::Snapshot = op {
            snapshots.push((vec.clone(), trie.clone()));
        }
        op.apply_to_vec(&mut vec);
        trie = op.apply_to_trie(&trie);

        trie.check_invariants();
        assert_eq!(trie.len(), vec.len());
        assert_eq!(vec, trie.iter().copied().collect::<Vec<_>>());
    }

    for (vec, trie) in snapshots {
        trie.check_invariants();
        assert_eq!(vec, trie.iter().copied().collect::<Vec<_>>());
    }

    Ok(())
}

#[test]
fn mutations() {
    let _ = env_logger::builder().is_test(true).try_init();
    arbtest(check_ops::<4>);
    arbtest(check_ops::<32>);
}

#[test]
fn get_matches_iter() {
    arbtest(|u| {
        let vec: Vec<u32> = arb_vec(u)?;
        let trie: Trie<u32, 4> = vec.iter().copied().collect();
        let drop: usize = u.arbitrary::<usize>()? % (vec.len() + 1);
        let trie = trie.drop(drop);

        for (i, x) in trie.iter().enumerate() {
            assert_eq!(trie.get(i), Some(x));
            assert_eq!(&trie[i], x);
        }
        assert_eq!(trie.get(trie.len()), None);

        Ok(())
    });
}

#[test]
fn iter_from() {
    arbtest(|u| {
        let mut vec: Vec<u32> = arb_vec(u)?;
        if !vec.is_empty() {
            let trie: Trie<u32, 4> = vec.iter().copied().collect();
            let idx: usize = u.arbitrary()?;
            let idx = idx % vec.len();

            let claimed_len = trie.iter_from(idx).len();
            let result: Vec<u32> = trie.iter_from(idx).copied().collect();
            vec.drain(..idx);
            assert_eq!(result, vec);
            assert_eq!(claimed_len, vec.len());
        }

        Ok(())
    });
}

#[test]
fn split_round_trip() {
    arbtest(|u| {
        let vec: Vec<u32> = arb_vec(u)?;
        let trie: Trie<u32, 4> = vec.iter().copied().collect();
        let n: usize = u.arbitrary::<usize>()? % (vec.len() + 1);

        let rebuilt = vec[..n]
            .iter()
            .rev()
            .fold(trie.drop(n), |acc, x| acc.prepend(*x));
        rebuilt.check_invariants();
        assert_eq!(rebuilt, trie);

        Ok(())
    });
}

#[test]
fn serde_round_trip() {
    arbtest(|u| {
        let vec: Vec<u32> = arb_vec(u)?;
        let trie: Trie<u32> = vec.iter().copied().collect();

        let json = serde_json::to_string(&trie).unwrap();
        assert_eq!(json, serde_json::to_string(&vec).unwrap());
        let back: Trie<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trie);

        Ok(())
    });
}
