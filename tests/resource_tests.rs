use chainrouter::router::{Controller, ResourceAction, ResourcePaths};
use chainrouter::{Context, Handler, Router};
use http::Method;

mod common;
use common::{body, tag};

fn listing(router: &Router) -> Vec<(String, String)> {
    router
        .get_routes()
        .iter()
        .map(|r| (r.method().to_string(), r.path().to_string()))
        .collect()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(m, p)| (m.to_string(), p.to_string()))
        .collect()
}

#[test]
fn test_resource_generates_twelve_routes_in_order() {
    let mut router = Router::default();
    router.resource("user", &Controller::new()).unwrap();

    assert_eq!(
        listing(&router),
        pairs(&[
            ("GET", "/users"),
            ("GET", "/users/new"),
            ("POST", "/users"),
            ("GET", "/users/:user"),
            ("GET", "/users/:user/edit"),
            ("PUT", "/users/:user"),
            ("POST", "/users/:user"),
            ("PATCH", "/users/:user"),
            ("DELETE", "/users/:user"),
            ("DELETE", "/users/:user"),
            ("DELETE", "/users/:user"),
            ("DELETE", "/users/:user"),
        ])
    );
}

#[test]
fn test_resource_pluralizes_y_ending() {
    let mut router = Router::with_prefix("/api");
    router.resource("company", &Controller::new()).unwrap();
    let routes = router.get_routes();
    assert_eq!(routes[0].path(), "/api/companies");
    assert_eq!(routes[3].path(), "/api/companies/:company");
}

#[test]
fn test_resource_names_in_either_number() {
    let cases = [
        ("user", "/users", "user"),
        ("users", "/users", "user"),
        ("category", "/categories", "category"),
        ("box", "/boxes", "box"),
        ("person", "/people", "person"),
        ("people", "/people", "person"),
        ("child", "/children", "child"),
        ("children", "/children", "child"),
        ("mouse", "/mice", "mouse"),
        ("leaf", "/leaves", "leaf"),
        ("leaves", "/leaves", "leaf"),
        ("ox", "/oxen", "ox"),
    ];
    for (name, collection, param) in cases {
        let paths = ResourcePaths::from_name(name).unwrap();
        assert_eq!(paths.collection.to_path(), collection, "collection of {name}");
        assert_eq!(paths.param, param, "param of {name}");
        assert_eq!(
            paths.member.to_path(),
            format!("{collection}/:{param}"),
            "member of {name}"
        );
    }
}

#[test]
fn test_irregular_resource_dispatches() {
    let controller = Controller::new().action("show", tag("shown"));
    let mut router = Router::default();
    router.resource("person", &controller).unwrap();

    let mut ctx = Context::new(Method::GET, "/people/ada");
    router.dispatcher().handle(&mut ctx).unwrap();
    assert_eq!(body(&ctx), "shown");
    assert_eq!(ctx.param("person"), Some("ada"));
}

#[test]
fn test_nested_resource_keeps_leading_segments() {
    let mut router = Router::default();
    router
        .resource("companies/:company/department", &Controller::new())
        .unwrap();
    let routes = router.get_routes();
    assert_eq!(routes[0].path(), "/companies/:company/departments");
    assert_eq!(
        routes[4].path(),
        "/companies/:company/departments/:department/edit"
    );

    let mut ctx = Context::new(Method::GET, "/companies/acme/departments/eng");
    router.dispatcher().handle(&mut ctx).unwrap();
    assert_eq!(ctx.param("company"), Some("acme"));
    assert_eq!(ctx.param("department"), Some("eng"));
}

#[test]
fn test_missing_actions_get_the_stub() {
    let mut router = Router::default();
    router.resource("user", &Controller::new()).unwrap();
    let chain = chainrouter::handler::compose(&[router.middleware(), tag("|after")]);

    let mut ctx = Context::new(Method::PUT, "/users/7");
    chain.run_to_end(&mut ctx).unwrap();
    assert_eq!(ctx.status, 501);
    assert_eq!(
        ctx.route.as_ref().map(|r| r.route().to_string()),
        Some("/users/:user".to_string())
    );
    // the stub keeps going downstream
    assert_eq!(body(&ctx), "Not Implemented|after");
}

#[test]
fn test_controller_handlers_are_used() {
    let controller = Controller::new()
        .action(
            "show",
            Handler::direct(|ctx, next| {
                let id = ctx.param("user").unwrap_or_default().to_string();
                ctx.respond(200, format!("user {id}"));
                next.run(ctx)
            }),
        )
        .actions("index", vec![tag("list;"), tag("page")]);

    let mut router = Router::default();
    router.resource("user", &controller).unwrap();
    let dispatcher = router.dispatcher();

    let mut ctx = Context::new(Method::GET, "/users/ada");
    dispatcher.handle(&mut ctx).unwrap();
    assert_eq!(ctx.status, 200);
    assert_eq!(body(&ctx), "user ada");

    let mut ctx = Context::new(Method::GET, "/users");
    dispatcher.handle(&mut ctx).unwrap();
    assert_eq!(body(&ctx), "list;page");
}

#[test]
fn test_new_is_matched_before_member() {
    let controller = Controller::new()
        .action("new", tag("new"))
        .action("show", tag("show"));
    let mut router = Router::default();
    router.resource("user", &controller).unwrap();

    let mut ctx = Context::new(Method::GET, "/users/new");
    router.dispatcher().handle(&mut ctx).unwrap();
    assert_eq!(body(&ctx), "new");
    assert!(ctx.params.is_empty());
}

#[test]
fn test_destroy_shadows_other_delete_aliases() {
    let controller = Controller::new()
        .action("remove", tag("remove"))
        .action("del", tag("del"));
    let mut router = Router::default();
    router.resource("user", &controller).unwrap();

    let mut ctx = Context::new(Method::DELETE, "/users/1");
    router.dispatcher().handle(&mut ctx).unwrap();
    // destroy has no handler, so the stub answers first
    assert_eq!(ctx.status, 501);

    let controller = controller.action("destroy", tag("destroy"));
    let mut router = Router::default();
    router.resource("user", &controller).unwrap();
    let mut ctx = Context::new(Method::DELETE, "/users/1");
    router.dispatcher().handle(&mut ctx).unwrap();
    assert_eq!(body(&ctx), "destroy");
}

#[test]
fn test_update_accepts_put_post_and_patch() {
    let controller = Controller::new().action("update", tag("updated"));
    let mut router = Router::default();
    router.resource("user", &controller).unwrap();
    let dispatcher = router.dispatcher();

    for method in [Method::PUT, Method::POST, Method::PATCH] {
        let mut ctx = Context::new(method, "/users/3");
        dispatcher.handle(&mut ctx).unwrap();
        assert_eq!(body(&ctx), "updated");
    }
    // POST on the collection is create, not update
    let mut ctx = Context::new(Method::POST, "/users");
    dispatcher.handle(&mut ctx).unwrap();
    assert_eq!(ctx.status, 501);
}

#[test]
fn test_unknown_actions_are_ignored() {
    let controller = Controller::new().action("publish", tag("publish"));
    let mut router = Router::default();
    router.resource("post", &controller).unwrap();
    assert_eq!(router.get_routes().len(), 12);
    assert!("publish".parse::<ResourceAction>().is_err());
}

#[test]
fn test_create_resource_does_not_register() {
    let router = Router::with_prefix("/v1");
    let routes = router.create_resource("user", &Controller::new()).unwrap();
    assert_eq!(routes.len(), 12);
    assert!(routes.iter().all(|r| r.prefix() == "/v1"));
    assert!(router.get_routes().is_empty());
}

#[test]
fn test_resource_routes_follow_earlier_ones() {
    let mut router = Router::default();
    router.add_route("GET", "/users/:user", [tag("mine")]).unwrap();
    router.resource("user", &Controller::new()).unwrap();
    assert_eq!(router.get_routes().len(), 13);

    let mut ctx = Context::new(Method::GET, "/users/9");
    router.dispatcher().handle(&mut ctx).unwrap();
    assert_eq!(body(&ctx), "mine");
}
