// Command-line driver: flag parsing, input selection and output formatting.
// Both the flag path and the interactive path produce an `UploadRequest`,
// which is then opened and uploaded the same way.

use crate::api::{GyazoClient, UploadMetadata, UploadedImage, UPLOAD_ENDPOINT};
use crate::clipboard::{ClipboardSource, SystemClipboard};
use crate::{config, ui};
use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gyazo", version)]
#[command(about = "Upload an image to Gyazo and print its URL", long_about = None)]
#[command(after_help = "EXAMPLES:\n  $ gyazo < image.png\n  $ gyazo -c -t \"gorilla image\"\n  $ gyazo -m image.png\n  $ gyazo -i")]
pub struct Args {
    /// Upload image from clipboard
    #[arg(short = 'c', long)]
    pub clipboard: bool,

    /// Print a Markdown image link instead of the bare URL
    #[arg(short = 'm', long)]
    pub markdown: bool,

    /// Interactive mode
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Title
    #[arg(short = 't', long)]
    pub title: Option<String>,

    /// Description
    #[arg(short = 'd', long = "desc")]
    pub description: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[arg(long, env = "GYAZO_UPLOAD_URL", default_value = UPLOAD_ENDPOINT, hide = true)]
    pub endpoint: String,

    /// Image file to upload (reads stdin when omitted)
    pub file: Option<PathBuf>,
}

/// Where the image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Clipboard,
    Stdin,
}

/// A resolved upload: the input source plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub source: InputSource,
    pub meta: UploadMetadata,
}

impl Args {
    /// Build the request described by the flags. A file argument beats `-c`,
    /// which beats stdin.
    pub fn request(&self) -> UploadRequest {
        let source = match (&self.file, self.clipboard) {
            (Some(path), _) => InputSource::File(path.clone()),
            (None, true) => InputSource::Clipboard,
            (None, false) => InputSource::Stdin,
        };
        UploadRequest {
            source,
            meta: UploadMetadata {
                title: self.title.clone(),
                description: self.description.clone(),
                filename: None,
            },
        }
    }
}

/// Open the input source. The returned reader is consumed by the upload.
pub fn open_source(source: &InputSource, clipboard: &dyn ClipboardSource) -> Result<Box<dyn Read>> {
    debug!("reading image from {:?}", source);
    match source {
        InputSource::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(file))
        }
        InputSource::Clipboard => {
            let png = clipboard.read_image().map_err(crate::Error::from)?;
            Ok(Box::new(Cursor::new(png)))
        }
        InputSource::Stdin => Ok(Box::new(io::stdin())),
    }
}

/// The line printed on success.
pub fn format_url(image: &UploadedImage, markdown: bool) -> String {
    if markdown {
        format!("![]({})", image.url)
    } else {
        image.url.clone()
    }
}

/// Open the request's input, upload it and return the output line.
pub fn upload_request(
    client: &GyazoClient,
    request: UploadRequest,
    clipboard: &dyn ClipboardSource,
    markdown: bool,
) -> Result<String> {
    let reader = open_source(&request.source, clipboard)?;

    let spinner = ui::spinner("Uploading...");
    let result = client.upload(request.meta, reader);
    spinner.finish_and_clear();

    Ok(format_url(&result?, markdown))
}

/// Run one invocation: resolve the token, collect the request, upload,
/// print one line to stdout.
pub fn run(args: Args) -> Result<()> {
    let token = config::resolve_token()?;
    let client = GyazoClient::with_endpoint(&token, args.endpoint.clone())?;
    debug!("upload endpoint {}", client.endpoint());

    let request = if args.interactive {
        ui::prompt_request()?
    } else {
        args.request()
    };

    let line = upload_request(&client, request, &SystemClipboard, args.markdown)?;
    let mut out = io::stdout().lock();
    writeln!(out, "{}", line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("gyazo").chain(argv.iter().copied())).unwrap()
    }

    fn image(url: &str) -> UploadedImage {
        serde_json::from_value(serde_json::json!({ "image_id": "x", "url": url })).unwrap()
    }

    struct EmptyClipboard;

    impl ClipboardSource for EmptyClipboard {
        fn read_image(&self) -> Result<Vec<u8>, ClipboardError> {
            Err(ClipboardError::NoImage)
        }
    }

    #[test]
    fn parses_short_flags() {
        let args = parse(&["-c", "-m", "-t", "gorilla", "-d", "a big one"]);
        assert!(args.clipboard);
        assert!(args.markdown);
        assert!(!args.interactive);
        assert_eq!(args.title.as_deref(), Some("gorilla"));
        assert_eq!(args.description.as_deref(), Some("a big one"));
        assert_eq!(args.file, None);
    }

    #[test]
    fn file_argument_beats_clipboard() {
        let request = parse(&["-c", "shot.png"]).request();
        assert_eq!(request.source, InputSource::File(PathBuf::from("shot.png")));
    }

    #[test]
    fn clipboard_beats_stdin() {
        assert_eq!(parse(&["-c"]).request().source, InputSource::Clipboard);
        assert_eq!(parse(&[]).request().source, InputSource::Stdin);
    }

    #[test]
    fn flags_fill_metadata() {
        let request = parse(&["-t", "t", "-d", "d"]).request();
        assert_eq!(
            request.meta,
            UploadMetadata {
                title: Some("t".into()),
                description: Some("d".into()),
                filename: None,
            }
        );
    }

    #[test]
    fn markdown_wraps_url() {
        let img = image("https://i.gyazo.com/x.png");
        assert_eq!(format_url(&img, true), "![](https://i.gyazo.com/x.png)");
        assert_eq!(format_url(&img, false), "https://i.gyazo.com/x.png");
    }

    #[test]
    fn missing_file_mentions_path() {
        let err = open_source(
            &InputSource::File(PathBuf::from("/definitely/not/here.png")),
            &EmptyClipboard,
        )
        .err()
        .unwrap();
        assert!(format!("{:#}", err).contains("/definitely/not/here.png"));
    }

    #[test]
    fn empty_clipboard_fails() {
        let err = open_source(&InputSource::Clipboard, &EmptyClipboard)
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "no image in clipboard");
    }
}
