//! services/api/src/bin/openapi.rs
//!
//! Generates the OpenAPI 3.0 specification for the flashcard API and saves
//! it to a file (`openapi.json` by default, or the path given as the first
//! command-line argument).

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());

    let spec_json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&path, spec_json)?;
    println!("OpenAPI specification generated at {}", path);

    Ok(())
}
