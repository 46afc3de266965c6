use super::*;

/// A right-nested chain, the shape a long `where` clause standardizes into.
enum Chain {
    Link(Box<Chain>),
    End,
}

fn build(depth: usize) -> Chain {
    let mut chain = Chain::End;
    for _ in 0..depth {
        chain = Chain::Link(Box::new(chain));
    }
    chain
}

fn depth_of(chain: &Chain) -> usize {
    ensure_sufficient_stack(|| match chain {
        Chain::Link(next) => depth_of(next) + 1,
        Chain::End => 0,
    })
}

fn dismantle(chain: Chain) {
    let mut current = chain;
    while let Chain::Link(next) = current {
        current = *next;
    }
}

#[test]
fn shallow_walk() {
    let chain = build(16);
    assert_eq!(depth_of(&chain), 16);
    dismantle(chain);
}

#[test]
fn deep_walk_grows_the_stack() {
    // 200k frames would overflow a default 8MB stack
    let chain = build(200_000);
    assert_eq!(depth_of(&chain), 200_000);
    dismantle(chain);
}

#[test]
fn passes_results_through() {
    let result: Result<u32, &str> = ensure_sufficient_stack(|| Err("malformed"));
    assert_eq!(result, Err("malformed"));
}
