use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use everimage_core::consts::DEFAULT_ERASER_SIZE;
use everimage_core::io::image_io::InputImage;
use everimage_core::pipeline::EverimageConfig;
use everimage_core::removebg::{
    handle_remove_bg, CutoutEditor, RemoveBgRequest, UploadedFile, Upstream, UpstreamError,
    UpstreamRequest, UpstreamResponse,
};
use tracing::debug;

use super::erase::erase_stroke;
use super::{output_path, parse_points, save};

const BOUNDARY: &str = "everimage-form-boundary";

/// Largest cut-out the service may return.
const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Args)]
pub struct RemoveBgArgs {
    /// Input image
    pub file: PathBuf,

    /// Service endpoint (overrides the configured one)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Erase leftovers from the cut-out: "x,y;x,y;..."
    #[arg(long)]
    pub erase: Option<String>,

    /// Eraser radius in pixels (5-100)
    #[arg(long, default_value_t = DEFAULT_ERASER_SIZE)]
    pub radius: u32,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Posts the upload to the segmentation service over HTTPS.
struct HttpUpstream {
    agent: ureq::Agent,
}

impl HttpUpstream {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Upstream for HttpUpstream {
    fn remove_background(
        &self,
        request: &UpstreamRequest,
    ) -> std::result::Result<UpstreamResponse, UpstreamError> {
        let transport = |e: ureq::Error| UpstreamError::Transport(e.to_string());
        let mut response = self
            .agent
            .post(request.endpoint.as_str())
            .header("X-Api-Key", request.api_key.as_str())
            .header("Content-Type", UpstreamRequest::content_type(BOUNDARY))
            .send(&request.multipart_body(BOUNDARY)[..])
            .map_err(transport)?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_vec()
            .map_err(transport)?;
        debug!(status, size = body.len(), "Segmentation service answered");
        Ok(UpstreamResponse { status, body })
    }
}

pub fn run(args: &RemoveBgArgs, config: &EverimageConfig) -> Result<()> {
    let input = InputImage::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let request = RemoveBgRequest {
        image: Some(UploadedFile {
            name: input.name,
            content_type: input.format.mime().to_string(),
            bytes: input.bytes,
        }),
    };

    let mut settings = config.removebg.clone();
    if let Some(ref endpoint) = args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    println!("Removing background via {}", settings.endpoint);

    let response = handle_remove_bg(&request, &HttpUpstream::new(), &settings);
    let mut editor = CutoutEditor::from_response(&response)?;

    if let Some(ref erase) = args.erase {
        let points = parse_points(erase)?;
        erase_stroke(&mut editor, &points, args.radius);
        println!("Erased {} point(s)", points.len());
    }

    let out = output_path(&args.file, args.output.as_deref(), CutoutEditor::export_name());
    save(editor.live(), &out)
}
