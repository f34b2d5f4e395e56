use serde_json::json;

use crate::handler::Handler;

/// Example handler: echoes the matched route and parameters back as JSON
pub fn echo_handler() -> Handler {
    Handler::direct(|ctx, next| {
        let params: serde_json::Map<String, serde_json::Value> = ctx
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone().into()))
            .collect();
        let route = ctx.route.as_ref().map(|r| r.route().to_string());
        ctx.set_header("content-type", "application/json");
        ctx.respond(
            200,
            json!({
                "method": ctx.method.as_str(),
                "path": ctx.path,
                "route": route,
                "params": params,
            }),
        );
        next.run(ctx)
    })
}
