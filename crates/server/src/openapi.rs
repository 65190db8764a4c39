use utoipa::OpenApi;

use crate::errors::ErrorBody;
use crate::routes::files::{FileBody, SaveFileRequest, SaveFileResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::files::list_files,
        crate::routes::files::get_file,
        crate::routes::files::save_file,
    ),
    components(
        schemas(
            SaveFileRequest,
            FileBody,
            SaveFileResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "health"),
        (name = "files", description = "Named JSON documents")
    )
)]
pub struct ApiDoc;
