use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::book_author::list_associations,
        api::book_author::get_association,
        api::book_author::create_association,
        api::book_author::update_association,
        api::book_author::delete_association,
        // Add other endpoints here as we document them
    ),
    tags(
        (name = "bookledger", description = "Bookledger API")
    )
)]
pub struct ApiDoc;
