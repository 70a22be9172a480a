use actix_cors::Cors;
use actix_web::http::header;

/// Any origin may POST to the relay; browsers call it straight from the
/// token's web pages.
pub fn relay_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}
