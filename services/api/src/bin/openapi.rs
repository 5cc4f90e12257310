//! services/api/src/bin/openapi.rs
//!
//! Dumps the Coloc Bali API contract (owner auth, owner villa management,
//! moderation, public listings and the renter context) to `openapi.json`,
//! so frontend clients can be generated without a running server.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const OUTPUT_PATH: &str = "openapi.json";

fn write_contract(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(path, json)?;
    println!("Wrote the Coloc Bali OpenAPI contract to {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    write_contract(OUTPUT_PATH)
}
