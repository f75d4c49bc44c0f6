use crate::service::drawing_session::DrawingSessions;
use crate::service::geocoder::Nominatim;
use crate::{Error, Result};
use actix_web::{
    post,
    web::{Data, Json},
};
use deadpool_sqlite::Pool;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::warn;

#[derive(Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: RpcMethod,
    pub params: Option<Value>,
    pub id: Value,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RpcMethod {
    // zone
    AddZone,
    GetZone,
    GetZones,
    UpdateZone,
    RemoveZone,
    SetZoneActive,
    // geofence
    ResolveZone,
    GetDeliveryOptions,
    CheckOrderMinimum,
    // location
    GeocodeAddress,
    SetRestaurantLocation,
    GetRestaurantLocation,
    LocateRestaurant,
    // drawing
    StartDrawingSession,
    SelectDrawingTool,
    BeginDrawingShape,
    CompleteDrawingShape,
    ConfigureDrawing,
    ConfirmDrawing,
    CancelDrawing,
    GetDrawingSession,
    CloseDrawingSession,
}

#[derive(Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Value,
}

#[derive(Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

impl RpcError {
    fn parse_error(data: Option<Value>) -> Self {
        Self {
            code: -32700,
            message: "Parse error".into(),
            data,
        }
    }

    fn invalid_request(data: Option<Value>) -> Self {
        Self {
            code: -32600,
            message: "Invalid Request".into(),
            data,
        }
    }

    fn method_not_found(data: Option<Value>) -> Self {
        Self {
            code: -32601,
            message: "Method not found".into(),
            data,
        }
    }

    /// Domain failures, `data` tells the caller what kind of failure it was
    fn server_error(error: &Error) -> Self {
        Self {
            code: -32000,
            message: "Server error".into(),
            data: Some(json!({
                "kind": error.kind(),
                "message": error.to_string(),
            })),
        }
    }
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(error),
            id,
        }
    }

    pub fn from<R>(id: Value, val: R) -> Result<Self>
    where
        R: Serialize,
    {
        Ok(Self::success(id, serde_json::to_value(&val)?))
    }
}

#[post("")]
pub async fn handle(
    req_body: String,
    pool: Data<Pool>,
    geocoder: Data<Nominatim>,
    sessions: Data<DrawingSessions>,
) -> Json<RpcResponse> {
    let Ok(req) = serde_json::from_str::<Map<String, Value>>(&req_body) else {
        let error_data = json!("Request body is not a valid JSON object");
        return Json(RpcResponse::error(
            Value::Null,
            RpcError::parse_error(Some(error_data)),
        ));
    };
    let id = req.get("id").cloned().unwrap_or_default();
    let Some(method) = req.get("method").and_then(Value::as_str) else {
        let error_data = json!("Field method is missing or isn't a string");
        return Json(RpcResponse::error(
            id,
            RpcError::invalid_request(Some(error_data)),
        ));
    };
    if serde_json::from_value::<RpcMethod>(Value::String(method.into())).is_err() {
        return Json(RpcResponse::error(
            id,
            RpcError::method_not_found(Some(json!(method))),
        ));
    }
    let req: RpcRequest = match serde_json::from_value(Value::Object(req)) {
        Ok(val) => val,
        Err(e) => {
            let data = Value::String(e.to_string());
            return Json(RpcResponse::error(id, RpcError::invalid_request(Some(data))));
        }
    };
    if req.jsonrpc != "2.0" {
        return Json(RpcResponse::error(id, RpcError::invalid_request(None)));
    }
    let id = req.id.clone();
    match dispatch(req, &pool, &geocoder, &sessions).await {
        Ok(res) => Json(res),
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "RPC call failed");
            Json(RpcResponse::error(id, RpcError::server_error(&e)))
        }
    }
}

async fn dispatch(
    req: RpcRequest,
    pool: &Pool,
    geocoder: &Nominatim,
    sessions: &DrawingSessions,
) -> Result<RpcResponse> {
    let id = req.id;
    match req.method {
        // zone
        RpcMethod::AddZone => RpcResponse::from(
            id,
            super::zone::add_zone::run(params(req.params)?, pool).await?,
        ),
        RpcMethod::GetZone => RpcResponse::from(
            id,
            super::zone::get_zone::run(params(req.params)?, pool).await?,
        ),
        RpcMethod::GetZones => RpcResponse::from(
            id,
            super::zone::get_zones::run(params(req.params)?, pool).await?,
        ),
        RpcMethod::UpdateZone => RpcResponse::from(
            id,
            super::zone::update_zone::run(params(req.params)?, pool).await?,
        ),
        RpcMethod::RemoveZone => RpcResponse::from(
            id,
            super::zone::remove_zone::run(params(req.params)?, pool).await?,
        ),
        RpcMethod::SetZoneActive => RpcResponse::from(
            id,
            super::zone::set_zone_active::run(params(req.params)?, pool).await?,
        ),
        // geofence
        RpcMethod::ResolveZone => RpcResponse::from(
            id,
            super::geofence::resolve_zone::run(params(req.params)?, pool).await?,
        ),
        RpcMethod::GetDeliveryOptions => RpcResponse::from(
            id,
            super::geofence::get_delivery_options::run(params(req.params)?, geocoder, pool)
                .await?,
        ),
        RpcMethod::CheckOrderMinimum => RpcResponse::from(
            id,
            super::geofence::check_order_minimum::run(params(req.params)?, pool).await?,
        ),
        // location
        RpcMethod::GeocodeAddress => RpcResponse::from(
            id,
            super::location::geocode_address::run(params(req.params)?, geocoder).await?,
        ),
        RpcMethod::SetRestaurantLocation => RpcResponse::from(
            id,
            super::location::set_restaurant_location::run(params(req.params)?, pool).await?,
        ),
        RpcMethod::GetRestaurantLocation => RpcResponse::from(
            id,
            super::location::get_restaurant_location::run(params(req.params)?, pool).await?,
        ),
        RpcMethod::LocateRestaurant => RpcResponse::from(
            id,
            super::location::locate_restaurant::run(params(req.params)?, geocoder, pool).await?,
        ),
        // drawing
        RpcMethod::StartDrawingSession => RpcResponse::from(
            id,
            super::drawing::start_drawing_session::run(params(req.params)?, sessions, pool)
                .await?,
        ),
        RpcMethod::SelectDrawingTool => RpcResponse::from(
            id,
            super::drawing::select_drawing_tool::run(params(req.params)?, sessions)?,
        ),
        RpcMethod::BeginDrawingShape => RpcResponse::from(
            id,
            super::drawing::begin_drawing_shape::run(params(req.params)?, sessions)?,
        ),
        RpcMethod::CompleteDrawingShape => RpcResponse::from(
            id,
            super::drawing::complete_drawing_shape::run(params(req.params)?, sessions)?,
        ),
        RpcMethod::ConfigureDrawing => RpcResponse::from(
            id,
            super::drawing::configure_drawing::run(params(req.params)?, sessions)?,
        ),
        RpcMethod::ConfirmDrawing => RpcResponse::from(
            id,
            super::drawing::confirm_drawing::run(params(req.params)?, sessions, pool).await?,
        ),
        RpcMethod::CancelDrawing => RpcResponse::from(
            id,
            super::drawing::cancel_drawing::run(params(req.params)?, sessions)?,
        ),
        RpcMethod::GetDrawingSession => RpcResponse::from(
            id,
            super::drawing::get_drawing_session::run(params(req.params)?, sessions)?,
        ),
        RpcMethod::CloseDrawingSession => RpcResponse::from(
            id,
            super::drawing::close_drawing_session::run(params(req.params)?, sessions)?,
        ),
    }
}

fn params<T>(val: Option<Value>) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(val.unwrap_or_default())
        .map_err(|e| Error::Validation(format!("Invalid params: {e}")))
}

#[cfg(test)]
mod test {
    use super::RpcResponse;
    use crate::db::conf::schema::Conf;
    use crate::db::test::pool;
    use crate::service::drawing_session::DrawingSessions;
    use crate::service::geocoder::Nominatim;
    use crate::Result;
    use actix_web::test::TestRequest;
    use actix_web::web::{scope, Data};
    use actix_web::{test, App};
    use serde_json::{json, Value};

    macro_rules! rpc_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(Data::new(pool()))
                    .app_data(Data::new(Nominatim::new(&Conf::mock())?))
                    .app_data(Data::new(DrawingSessions::default()))
                    .service(scope("rpc").service(super::handle)),
            )
            .await
        };
    }

    fn call(method: &str, params: Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        })
    }

    #[test]
    async fn parse_error() -> Result<()> {
        let app = rpc_app!();
        let req = TestRequest::post()
            .uri("/rpc")
            .set_payload("{not json")
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(-32700, res.error.unwrap().code);
        Ok(())
    }

    #[test]
    async fn unknown_method() -> Result<()> {
        let app = rpc_app!();
        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(call("drop_tables", json!({})))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(-32601, res.error.unwrap().code);
        assert_eq!(json!(1), res.id);
        Ok(())
    }

    #[test]
    async fn invalid_version() -> Result<()> {
        let app = rpc_app!();
        let mut body = call("get_zones", json!({ "restaurant_id": "r1" }));
        body["jsonrpc"] = json!("1.0");
        let req = TestRequest::post().uri("/rpc").set_json(body).to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(-32600, res.error.unwrap().code);
        Ok(())
    }

    #[test]
    async fn domain_error() -> Result<()> {
        let app = rpc_app!();
        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(call("get_zone", json!({ "id": 42 })))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        let error = res.error.unwrap();
        assert_eq!(-32000, error.code);
        assert_eq!(Some(json!("not_found")), error.data.map(|it| it["kind"].clone()));
        Ok(())
    }

    #[test]
    async fn invalid_params() -> Result<()> {
        let app = rpc_app!();
        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(call("get_zone", json!({ "id": "one" })))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        let error = res.error.unwrap();
        assert_eq!(Some(json!("validation")), error.data.map(|it| it["kind"].clone()));
        Ok(())
    }

    #[test]
    async fn add_and_resolve_zone() -> Result<()> {
        let app = rpc_app!();
        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(call(
                "add_zone",
                json!({
                    "restaurant_id": "r1",
                    "name": "Centro",
                    "geometry": {
                        "type": "circle",
                        "center": { "lat": 38.72, "lon": -9.14 },
                        "radius_km": 2.0,
                    },
                    "delivery_fee": 2.5,
                }),
            ))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        let zone = res.result.unwrap();
        assert_eq!(json!("circle"), zone["zone_type"]);
        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(call(
                "resolve_zone",
                json!({ "restaurant_id": "r1", "lat": 38.73, "lon": -9.14 }),
            ))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        let res = res.result.unwrap();
        assert_eq!(zone["id"], res["zone_id"]);
        assert_eq!(json!(2.5), res["delivery_fee"]);
        assert_eq!(json!("30-60 min"), res["estimated_time"]);
        Ok(())
    }

    #[test]
    async fn drawing_flow() -> Result<()> {
        let app = rpc_app!();
        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(call("start_drawing_session", json!({ "restaurant_id": "r1" })))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        let session = res.result.unwrap();
        assert_eq!(json!("idle"), session["state"]);
        let session_id = session["session_id"].clone();

        let steps = [
            (
                "select_drawing_tool",
                json!({ "session_id": session_id, "tool": "circle" }),
                "tool_selected",
            ),
            (
                "begin_drawing_shape",
                json!({ "session_id": session_id }),
                "drawing",
            ),
            (
                "complete_drawing_shape",
                json!({
                    "session_id": session_id,
                    "shape": {
                        "type": "circle",
                        "center": { "lat": 38.72, "lon": -9.14 },
                        "radius_m": 2000.0,
                    },
                }),
                "pending_shape",
            ),
            (
                "configure_drawing",
                json!({ "session_id": session_id, "fields": { "delivery_fee": 1.5 } }),
                "pending_shape",
            ),
        ];
        for (method, params, state) in steps {
            let req = TestRequest::post()
                .uri("/rpc")
                .set_json(call(method, params))
                .to_request();
            let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
            assert_eq!(json!(state), res.result.unwrap()["state"], "{method}");
        }

        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(call("confirm_drawing", json!({ "session_id": session_id })))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        let zone = res.result.unwrap();
        assert_eq!(json!("Zone 1"), zone["name"]);
        assert_eq!(json!(2.0), zone["geometry"]["radius_km"]);
        assert_eq!(json!(1.5), zone["delivery_fee"]);

        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(call("cancel_drawing", json!({ "session_id": session_id })))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json!(false), res.result.unwrap()["save_in_flight"]);

        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(call("close_drawing_session", json!({ "session_id": session_id })))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        assert!(res.error.is_none());
        Ok(())
    }
}
