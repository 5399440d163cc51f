use crate::DynResult;
use std::ffi::OsStr;
use std::io::{ErrorKind, Read as _};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Something that can deliver the raw text lines of one document.
pub trait LineProvider {
    /// Shown in the report, e.g. the file name.
    fn name(&self) -> String;
    fn read_lines(&self) -> DynResult<Vec<String>>;
}

fn split_lines(content: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(content).lines().map(str::to_owned).collect()
}

pub struct TextFileSource {
    path: PathBuf,
}

impl TextFileSource {
    pub fn new(path: impl Into<PathBuf>) -> TextFileSource {
        TextFileSource { path: path.into() }
    }
}

impl LineProvider for TextFileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_lines(&self) -> DynResult<Vec<String>> {
        log::info!("reading {}", self.path.display());
        match std::fs::read(&self.path) {
            Ok(content) => Ok(split_lines(&content)),
            Err(e) => Err(format!("cannot read {}: {e}", self.path.display()))?,
        }
    }
}

pub struct StdinSource;

impl LineProvider for StdinSource {
    fn name(&self) -> String {
        "<stdin>".to_owned()
    }

    fn read_lines(&self) -> DynResult<Vec<String>> {
        log::info!("reading standard input");
        let mut content = vec![];
        std::io::stdin().lock().read_to_end(&mut content)?;
        Ok(split_lines(&content))
    }
}

/// Runs an external converter (pdftotext by default) and reads what it prints.
pub struct ExtractorSource {
    path: PathBuf,
    program: String,
    args: Vec<String>,
}

pub const INPUT_PLACEHOLDER: &str = "{input}";

impl ExtractorSource {
    /// `template` is split like a shell would split it. Every `{input}` is replaced with
    /// the document path; without a placeholder the path is appended.
    pub fn new(path: impl Into<PathBuf>, template: &str) -> DynResult<ExtractorSource> {
        let path = path.into();
        let words = shell_words::split(template).map_err(|e| format!("invalid extractor command {template:?}: {e}"))?;
        let Some((program, rest)) = words.split_first() else {
            return Err("the extractor command is empty")?;
        };

        let input = path.to_string_lossy();
        let mut args: Vec<String> = rest.iter().map(|word| word.replace(INPUT_PLACEHOLDER, &input)).collect();
        if !words.iter().any(|word| word.contains(INPUT_PLACEHOLDER)) {
            args.push(input.into_owned());
        }

        Ok(ExtractorSource {
            program: program.clone(),
            args,
            path,
        })
    }

    pub fn command_line(&self) -> String {
        shell_words::join(std::iter::once(&self.program).chain(self.args.iter()))
    }
}

impl LineProvider for ExtractorSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_lines(&self) -> DynResult<Vec<String>> {
        log::info!("extracting text from {}", self.path.display());
        log::debug!("running {}", self.command_line());

        let output = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
        {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(format!(
                    "'{}' was not found. It is needed to extract text from {}. \
                     Install it (pdftotext is part of poppler-utils) or choose another tool with --extractor.",
                    self.program,
                    self.path.display()
                ))?;
            }
            Err(e) => return Err(format!("cannot run '{}': {e}", self.program))?,
        };

        // TODO: std::process::ExitStatus::exit_ok() is unstable
        if !output.status.success() {
            return Err(format!(
                "'{}' failed on {}: {}",
                self.command_line(),
                self.path.display(),
                output.status
            ))?;
        }
        Ok(split_lines(&output.stdout))
    }
}

/// `-` reads standard input, `.pdf` files go through the extractor, anything else is
/// read as plain text.
pub fn provider_for(path: &str, extractor: &str) -> DynResult<Box<dyn LineProvider>> {
    if path == "-" {
        return Ok(Box::new(StdinSource));
    }
    let is_pdf = Path::new(path)
        .extension()
        .and_then(OsStr::to_str)
        .map_or(false, |extension| extension.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        Ok(Box::new(ExtractorSource::new(path, extractor)?))
    } else {
        Ok(Box::new(TextFileSource::new(path)))
    }
}
