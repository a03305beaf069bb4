use super::*;

use proptest::prelude::*;

// Small alphabets so that generated routes share prefixes, split nodes and
// compete between static, param and wildcard branches.
const STATICS: [&str; 6] = ["a", "b", "ab", "abc", "users", "me"];
const VALUES: [&str; 6] = ["a", "b", "x", "me", "42", "ab"];
const TAILS: [&str; 4] = ["", "a", "a/b", "users/me"];
const METHODS: [Method; 3] = [Method::Get, Method::Post, Method::Delete];

#[derive(Clone, Debug)]
enum Seg {
    Static(usize),
    Param,
}

#[derive(Clone, Debug)]
struct RouteDef {
    method: Method,
    segs: Vec<Seg>,
    wildcard: bool,
}

impl RouteDef {
    fn pattern(&self) -> String {
        let mut pattern = String::new();
        let mut n = 0;
        for seg in &self.segs {
            match seg {
                Seg::Static(i) => {
                    pattern.push('/');
                    pattern.push_str(STATICS[*i]);
                }
                Seg::Param => {
                    pattern.push_str(&format!("/:p{n}"));
                    n += 1;
                }
            }
        }
        if self.wildcard {
            pattern.push_str("/*");
        }
        if pattern.is_empty() {
            pattern.push('/');
        }
        pattern
    }

    /// A concrete path this route matches.
    fn path(&self, picks: &[usize], tail: usize) -> String {
        let mut path = String::new();
        let mut n = 0;
        for seg in &self.segs {
            path.push('/');
            match seg {
                Seg::Static(i) => path.push_str(STATICS[*i]),
                Seg::Param => {
                    path.push_str(VALUES[picks[n % picks.len()]]);
                    n += 1;
                }
            }
        }
        if self.wildcard {
            path.push('/');
            path.push_str(TAILS[tail]);
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }
}

fn seg_strategy() -> impl Strategy<Value = Seg> {
    prop_oneof![
        3 => (0..STATICS.len()).prop_map(Seg::Static),
        1 => Just(Seg::Param),
    ]
}

fn route_strategy() -> impl Strategy<Value = RouteDef> {
    (
        0..METHODS.len(),
        prop::collection::vec(seg_strategy(), 0..4),
        prop::bool::weighted(0.2),
    )
        .prop_map(|(m, segs, wildcard)| RouteDef {
            method: METHODS[m],
            segs,
            wildcard,
        })
}

fn routes_strategy() -> impl Strategy<Value = Vec<RouteDef>> {
    prop::collection::vec(route_strategy(), 1..24)
}

fn picks_strategy() -> impl Strategy<Value = (Vec<usize>, usize)> {
    (
        prop::collection::vec(0..VALUES.len(), 4),
        0..TAILS.len(),
    )
}

fn build<'a>(routes: impl IntoIterator<Item = &'a RouteDef>) -> Router<String> {
    let mut router = Router::new();
    for route in routes {
        let pattern = route.pattern();
        router
            .add(route.method, &pattern, pattern.clone())
            .unwrap();
    }
    router
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn registered_paths_resolve(routes in routes_strategy(), picks in picks_strategy()) {
        let router = build(&routes);

        for route in &routes {
            let path = route.path(&picks.0, picks.1);
            let mut values = router.param_buffer();
            let m = router.find(route.method, &path, &mut values);

            prop_assert!(
                m.handler.is_found(),
                "{} {} ({}) not found in\n{}",
                route.method,
                path,
                route.pattern(),
                router
            );
            prop_assert_eq!(m.handler.found().map(String::as_str), Some(m.pattern));
            let bound = &values[..m.param_names.len()];
            prop_assert_eq!(fill_pattern(m.pattern, bound), path.clone());
        }
    }

    #[test]
    fn lookups_are_consistent(
        routes in routes_strategy(),
        requests in prop::collection::vec(route_strategy(), 1..8),
        picks in picks_strategy(),
    ) {
        let router = build(&routes);

        for request in &requests {
            let path = request.path(&picks.0, picks.1);
            let mut values = router.param_buffer();
            let m = router.find(request.method, &path, &mut values);

            match m.handler {
                Handler::Found(_) => {
                    let bound = &values[..m.param_names.len()];
                    prop_assert_eq!(fill_pattern(m.pattern, bound), path.clone());
                }
                Handler::MethodNotAllowed => {
                    let allowed = m.allowed();
                    prop_assert!(!allowed.is_empty());
                    prop_assert!(!allowed.contains(&request.method));
                }
                Handler::NotFound => {
                    prop_assert!(m.pattern.is_empty());
                }
            }
        }
    }

    #[test]
    fn insertion_order_does_not_matter(
        routes in routes_strategy(),
        requests in prop::collection::vec(route_strategy(), 1..8),
        picks in picks_strategy(),
    ) {
        let forward = build(&routes);
        let backward = build(routes.iter().rev());
        prop_assert_eq!(forward.max_params(), backward.max_params());

        for request in requests.iter().chain(&routes) {
            let path = request.path(&picks.0, picks.1);
            let mut a = forward.param_buffer();
            let mut b = backward.param_buffer();
            let ma = forward.find(request.method, &path, &mut a);
            let mb = backward.find(request.method, &path, &mut b);

            prop_assert_eq!(ma.handler.found(), mb.handler.found());
            prop_assert_eq!(ma.handler.is_found(), mb.handler.is_found());
            prop_assert_eq!(ma.pattern, mb.pattern);
            prop_assert_eq!(&a[..ma.param_names.len()], &b[..mb.param_names.len()]);
        }
    }
}
