use chainrouter::path::join_prefix;
use chainrouter::router::RouteTarget;
use chainrouter::{Context, Handler, Router, RouterConfig, RouterError};
use http::Method;

mod common;
use common::{body, tag};

#[test]
fn test_add_route_appends_one_route_with_joined_path() {
    let cases = [
        ("/", "/users", 1usize),
        ("/api", "/users/:user", 2),
        ("/api/v3/", "users", 3),
    ];
    for (prefix, path, handlers) in cases {
        let mut router = Router::with_prefix(prefix);
        let chain: Vec<Handler> = (0..handlers).map(|_| tag("x")).collect();
        router.add_route("GET", path, chain).unwrap();

        let routes = router.get_routes();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path(), join_prefix(prefix, path));
        assert_eq!(routes[0].middlewares().len(), handlers);
        assert_eq!(routes[0].route(), path);
    }
}

#[test]
fn test_handler_aggregation_across_shorthand_and_trailing() {
    let router = Router::default();
    let route = router
        .create_route("PATCH /a", vec![tag("1"), tag("2")], [tag("3")])
        .unwrap();
    assert_eq!(route.method(), &Method::PATCH);
    assert_eq!(route.middlewares().len(), 3);
}

#[test]
fn test_invalid_arguments() {
    let mut router = Router::default();

    // a handler where the path belongs, with no path in the method token
    let err = router
        .add_route("GET", RouteTarget::Handlers(vec![tag("x")]), [])
        .unwrap_err();
    assert!(err.is_invalid_argument());

    // not a verb
    let err = router.add_route("123", "/x", [tag("x")]).unwrap_err();
    assert!(matches!(
        err,
        RouterError::InvalidArgument {
            operation: "createRoute",
            ..
        }
    ));

    assert!(router.get_routes().is_empty());
}

#[test]
fn test_invalid_pattern_is_reported() {
    let router = Router::default();
    let err = router.create_route("GET", "/x/:id([)", [tag("x")]).unwrap_err();
    assert!(matches!(err, RouterError::InvalidPattern { .. }));
}

#[test]
fn test_duplicates_are_kept_in_order() {
    let mut router = Router::default();
    router
        .add_route("GET", "/dup", [tag("first")])
        .unwrap()
        .add_route("GET", "/dup", [tag("second")])
        .unwrap();
    assert_eq!(router.get_routes().len(), 2);
}

#[test]
fn test_get_route_first_match_across_methods() {
    let mut router = Router::with_prefix("/api");
    router.add_route("POST", "/users", [tag("p")]).unwrap();
    router.add_route("GET", "/users", [tag("g")]).unwrap();
    let a = router.get_route("users").unwrap();
    let b = router.get_route("/users").unwrap();
    assert_eq!(a.method(), &Method::POST);
    assert!(a.same_definition(&b));
}

#[test]
fn test_extend_remounts_a_copy() {
    let mut a = Router::with_prefix("/api");
    a.add_route("GET", "/foo", [tag("foo")]).unwrap();
    let mut b = Router::default();
    b.add_route("GET", "/bar", [tag("bar")]).unwrap();

    a.extend(&b).unwrap();

    let routes = a.get_routes();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[1].prefix(), "/api");
    assert_eq!(routes[1].path(), "/api/bar");

    let source = b.get_routes();
    assert_eq!(source.len(), 1);
    assert_eq!(source[0].prefix(), "/");
    assert_eq!(source[0].path(), "/bar");
}

#[test]
fn test_extend_doubles_matching_prefix_segment() {
    let mut router = Router::default();
    router.add_route("GET", "/foo/bar", [tag("a")]).unwrap();
    router.add_route("GET", "/api/v4/qux", [tag("b")]).unwrap();
    let mut api = Router::with_prefix("/api/v4");
    api.add_route("GET", "/woohoo", [tag("c")]).unwrap();

    api.extend(&router).unwrap();

    let paths: Vec<String> = api.get_routes().iter().map(|r| r.path().to_string()).collect();
    assert_eq!(
        paths,
        vec!["/api/v4/woohoo", "/api/v4/foo/bar", "/api/v4/api/v4/qux"]
    );
}

#[test]
fn test_extend_twice_is_idempotent() {
    let mut source = Router::default();
    source.add_route("GET", "/x/:id", [tag("x")]).unwrap();

    let mut first = Router::with_prefix("/api");
    first.extend(&source).unwrap();
    let mut second = Router::with_prefix("/api");
    second.extend(&first).unwrap();

    let a = &first.get_routes()[0];
    let b = &second.get_routes()[0];
    assert_eq!(a.path(), b.path());
    assert_eq!(a.matcher(), b.matcher());
}

#[test]
fn test_extend_accepts_plain_route_lists() {
    let builder = Router::with_prefix("/elsewhere");
    let list = vec![builder.create_route("GET", "/a", [tag("a")]).unwrap()];

    let mut router = Router::with_prefix("/here");
    router.extend(&list).unwrap();
    router.extend(list.as_slice()).unwrap();
    let routes = router.get_routes();
    assert_eq!(routes.len(), 2);
    assert!(routes.iter().all(|r| r.path() == "/here/a"));
}

#[test]
fn test_extend_recompiles_routes_with_other_options() {
    let mut config = RouterConfig::with_prefix("/api");
    config.matcher.sensitive = true;
    let mut source = Router::new(config);
    source.add_route("GET", "/Users", [tag("users")]).unwrap();

    let mut router = Router::with_prefix("/api");
    router.extend(&source).unwrap();

    let route = &router.get_routes()[0];
    assert_eq!(route.matcher().options(), router.config().matcher);
    assert!(!route.matcher().options().sensitive);
    assert!(source.get_routes()[0].matcher().options().sensitive);

    let mut ctx = Context::new(Method::GET, "/api/users");
    router.dispatcher().handle(&mut ctx).unwrap();
    assert_eq!(body(&ctx), "users");
}

#[test]
fn test_extend_keeps_same_prefix_routes_as_is() {
    let mut a = Router::with_prefix("/api");
    let mut b = Router::with_prefix("/api");
    b.add_route("GET", "/x", [tag("x")]).unwrap();
    a.extend(&b).unwrap();
    assert!(a.get_routes()[0].same_definition(&b.get_routes()[0]));
    assert_eq!(a.get_routes()[0].path(), "/api/x");
}

#[test]
fn test_group_routes_discards_dest_handlers() {
    let router = Router::default();
    let dest = router
        .create_route("GET", "/foo/bar", [tag("d1"), tag("d2")])
        .unwrap();
    let src = router.create_route("POST", "/baz/qux", [tag("s1")]).unwrap();

    let grouped = router.group_routes(&[dest, src]).unwrap();
    assert_eq!(grouped.route(), "/foo/bar/baz/qux");
    assert_eq!(grouped.middlewares().len(), 1);
    assert_eq!(grouped.method(), &Method::POST);
}

#[test]
fn test_group_routes_concatenates_literally() {
    let router = Router::with_prefix("/api/v3");
    let foo = router.create_route("GET /foo/qux/sas", tag("a"), []).unwrap();
    let bar = router.create_route("GET bar", tag("b"), []).unwrap();
    let grouped = router.group_routes(&[foo, bar]).unwrap();
    assert_eq!(grouped.route(), "/foo/qux/sasbar");
    assert_eq!(grouped.path(), "/api/v3/foo/qux/sasbar");
}

#[test]
fn test_router_from_config() {
    let config = RouterConfig::from_yaml_str("prefix: /v1\nsensitive: true\n").unwrap();
    let mut router = Router::new(config);
    router.add_route("GET", "/Users", [tag("x")]).unwrap();
    let route = &router.get_routes()[0];
    assert!(route.matcher().is_match("/v1/Users"));
    assert!(!route.matcher().is_match("/v1/users"));
}
