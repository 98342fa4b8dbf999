//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into a separate module.
//!
//! Handlers never block: every document operation and event publication is awaited, so a worker thread keeps serving
//! other requests while a handler waits on the database or on a full event queue.
use std::str::FromStr;

use actix_web::{get, web, web::ServiceConfig, HttpResponse, Responder};
use log::*;
use rsvp_engine::{
    db_types::{Client, ClientId, Merchant, MerchantId, NewOrder, Order, OrderId, OwnerKind, PushToken, TokenOwner},
    events::{ClientUpdatedEvent, OrderUpdatedEvent},
    DocumentApi,
    NotificationDatabase,
};

use crate::{
    data_objects::{DocumentChange, JsonResponse, LocationUpdate, StatusUpdate, TokenRegistration},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Registers every route against a [`DocumentApi<B>`] that must already be in the app data.
pub fn configure_routes<B: NotificationDatabase>(cfg: &mut ServiceConfig) {
    cfg.service(health)
        .service(OrderTriggerRoute::<B>::new())
        .service(ClientTriggerRoute::<B>::new())
        .service(CreateOrderRoute::<B>::new())
        .service(FetchOrderRoute::<B>::new())
        .service(AppendOrderStatusRoute::<B>::new())
        .service(FetchClientRoute::<B>::new())
        .service(UpsertClientRoute::<B>::new())
        .service(UpdateClientLocationRoute::<B>::new())
        .service(UpsertMerchantRoute::<B>::new())
        .service(FetchTokensRoute::<B>::new())
        .service(RegisterTokenRoute::<B>::new())
        .service(RemoveTokenRoute::<B>::new());
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Triggers  ----------------------------------------------------
route!(order_trigger => Post "/triggers/orders/{id}" impl NotificationDatabase);
/// Change-feed endpoint for order documents.
///
/// An external document store posts the order as it was before and after a write. The pair is queued for the
/// order-status watcher and the request returns `202 Accepted` immediately. The watcher's outcome is only logged.
pub async fn order_trigger<B: NotificationDatabase>(
    path: web::Path<OrderId>,
    body: web::Json<DocumentChange<Order>>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let DocumentChange { before, after } = body.into_inner();
    debug!("💻️ POST order_trigger({order_id})");
    api.publish_order_update(OrderUpdatedEvent::new(order_id.clone(), before, after)).await;
    Ok(HttpResponse::Accepted().json(JsonResponse::success(format!("Update to order {order_id} queued"))))
}

route!(client_trigger => Post "/triggers/clients/{uid}" impl NotificationDatabase);
/// Change-feed endpoint for client documents. See [`order_trigger`].
pub async fn client_trigger<B: NotificationDatabase>(
    path: web::Path<ClientId>,
    body: web::Json<DocumentChange<Client>>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let uid = path.into_inner();
    let DocumentChange { before, after } = body.into_inner();
    debug!("💻️ POST client_trigger({uid})");
    api.publish_client_update(ClientUpdatedEvent::new(uid.clone(), before, after)).await;
    Ok(HttpResponse::Accepted().json(JsonResponse::success(format!("Update to client {uid} queued"))))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl NotificationDatabase);
pub async fn create_order<B: NotificationDatabase>(
    body: web::Json<NewOrder>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order = body.into_inner();
    debug!("💻️ POST create_order({})", order.id);
    if order.id.as_str().is_empty() {
        return Err(ServerError::InvalidRequestBody("An order id is required".into()));
    }
    let order = api.create_order(order).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(fetch_order => Get "/orders/{id}" impl NotificationDatabase);
pub async fn fetch_order<B: NotificationDatabase>(
    path: web::Path<OrderId>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    trace!("💻️ GET fetch_order({order_id})");
    let order =
        api.fetch_order(&order_id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("orders/{order_id}")))?;
    Ok(HttpResponse::Ok().json(order))
}

route!(append_order_status => Post "/orders/{id}/status" impl NotificationDatabase);
/// Appends a status to an order's history. Both parties are notified of the new status.
pub async fn append_order_status<B: NotificationDatabase>(
    path: web::Path<OrderId>,
    body: web::Json<StatusUpdate>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let status = body.into_inner().status;
    debug!("💻️ POST append_order_status({order_id}, {status})");
    let order = api.append_order_status(&order_id, status).await?;
    Ok(HttpResponse::Ok().json(order))
}

//----------------------------------------------   Clients  ----------------------------------------------------
route!(fetch_client => Get "/clients/{uid}" impl NotificationDatabase);
pub async fn fetch_client<B: NotificationDatabase>(
    path: web::Path<ClientId>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let uid = path.into_inner();
    trace!("💻️ GET fetch_client({uid})");
    let client = api.fetch_client(&uid).await?.ok_or_else(|| ServerError::NoRecordFound(format!("clients/{uid}")))?;
    Ok(HttpResponse::Ok().json(client))
}

route!(upsert_client => Put "/clients/{uid}" impl NotificationDatabase);
/// Creates or replaces a client. The uid in the path takes precedence over any uid in the body.
pub async fn upsert_client<B: NotificationDatabase>(
    path: web::Path<ClientId>,
    body: web::Json<Client>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let client = Client { uid: path.into_inner(), ..body.into_inner() };
    debug!("💻️ PUT upsert_client({})", client.uid);
    let client = api.upsert_client(client).await?;
    Ok(HttpResponse::Ok().json(client))
}

route!(update_client_location => Put "/clients/{uid}/location" impl NotificationDatabase);
pub async fn update_client_location<B: NotificationDatabase>(
    path: web::Path<ClientId>,
    body: web::Json<LocationUpdate>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let uid = path.into_inner();
    let location = body.into_inner().location_coordinate;
    trace!("💻️ PUT update_client_location({uid}, {location})");
    let client = api.update_client_location(&uid, &location).await?;
    Ok(HttpResponse::Ok().json(client))
}

//----------------------------------------------   Merchants  ----------------------------------------------------
route!(upsert_merchant => Put "/merchants/{id}" impl NotificationDatabase);
pub async fn upsert_merchant<B: NotificationDatabase>(
    path: web::Path<MerchantId>,
    body: web::Json<Merchant>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let merchant = Merchant { id: path.into_inner(), ..body.into_inner() };
    debug!("💻️ PUT upsert_merchant({})", merchant.id);
    let merchant = api.upsert_merchant(merchant).await?;
    Ok(HttpResponse::Ok().json(merchant))
}

//----------------------------------------------   Push tokens  ----------------------------------------------------
route!(fetch_tokens => Get "/tokens/{kind}/{owner}" impl NotificationDatabase);
pub async fn fetch_tokens<B: NotificationDatabase>(
    path: web::Path<(String, String)>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let owner = token_owner(path.into_inner())?;
    trace!("💻️ GET fetch_tokens({owner})");
    let tokens = api.fetch_tokens(&owner).await?;
    Ok(HttpResponse::Ok().json(tokens))
}

route!(register_token => Post "/tokens/{kind}/{owner}" impl NotificationDatabase);
pub async fn register_token<B: NotificationDatabase>(
    path: web::Path<(String, String)>,
    body: web::Json<TokenRegistration>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let owner = token_owner(path.into_inner())?;
    let token = body.into_inner().token;
    debug!("💻️ POST register_token({owner})");
    if token.as_str().is_empty() {
        return Err(ServerError::InvalidRequestBody("The push token cannot be empty".into()));
    }
    let response = if api.register_token(&owner, &token).await? {
        HttpResponse::Created().json(JsonResponse::success(format!("Token registered for {owner}")))
    } else {
        HttpResponse::Ok().json(JsonResponse::success(format!("Token was already registered for {owner}")))
    };
    Ok(response)
}

route!(remove_token => Delete "/tokens/{kind}/{owner}/{token}" impl NotificationDatabase);
pub async fn remove_token<B: NotificationDatabase>(
    path: web::Path<(String, String, String)>,
    api: web::Data<DocumentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (kind, owner, token) = path.into_inner();
    let owner = token_owner((kind, owner))?;
    debug!("💻️ DELETE remove_token({owner})");
    let response = if api.remove_token(&owner, &PushToken::from(token)).await? {
        JsonResponse::success(format!("Token removed from {owner}"))
    } else {
        JsonResponse::failure(format!("{owner} does not have that token"))
    };
    Ok(HttpResponse::Ok().json(response))
}

fn token_owner((kind, id): (String, String)) -> Result<TokenOwner, ServerError> {
    let kind = OwnerKind::from_str(&kind).map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?;
    Ok(TokenOwner::new(kind, &id))
}
