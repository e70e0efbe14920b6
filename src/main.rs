//! local-images 命令行入口
//!
//! 扮演构建工具的角色：注册转换，遍历输出目录中的 HTML 文件，
//! 逐个执行转换并写回有变化的文件。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use local_images::config::PluginOptions;
use local_images::core::{print_error_message, print_info_message, LocalImages};
use local_images::env::EnvConfig;

/// Download remote images referenced by a built site and rewrite the HTML to
/// point at local copies.
#[derive(Parser, Debug)]
#[command(name = "local-images")]
#[command(author, version, about)]
#[command(after_help = local_images::env::help_text())]
struct Args {
    /// Root output directory of the site build
    #[arg(short, long)]
    dist_path: Option<String>,

    /// Sub-path under the output directory for localized images, also the public URL prefix
    #[arg(short, long)]
    asset_path: Option<String>,

    /// CSS selector for image-like nodes [default: img]
    #[arg(short, long)]
    selector: Option<String>,

    /// Comma-separated, ordered list of attributes holding the image reference [default: src]
    #[arg(long)]
    attribute: Option<String>,

    /// Re-use images already present in the asset directory
    #[arg(short, long)]
    use_existing: bool,

    /// Log every saved image
    #[arg(short, long)]
    verbose: bool,

    /// TOML file with plugin options (camelCase keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-image download timeout in seconds (1-3600)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    timeout: Option<u64>,

    /// User-Agent header sent with downloads
    #[arg(long)]
    user_agent: Option<String>,
}

impl Args {
    fn plugin_options(&self) -> PluginOptions {
        PluginOptions {
            dist_path: self.dist_path.clone(),
            asset_path: self.asset_path.clone(),
            selector: self.selector.clone(),
            attribute: self.attribute.clone(),
            use_existing: self.use_existing,
            verbose: self.verbose,
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}

fn init_tracing(env: &EnvConfig) {
    let no_color = env.no_color || !atty::is(atty::Stream::Stderr);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&env.log_level));

    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init();
}

/// Collects `.html` files below `dir` in name order, skipping `skip_dir`
fn find_html_documents(dir: &Path, skip_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    collect_html_documents(dir, skip_dir, &mut documents)?;
    Ok(documents)
}

fn collect_html_documents(
    dir: &Path,
    skip_dir: &Path,
    documents: &mut Vec<PathBuf>,
) -> io::Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if path != skip_dir {
                collect_html_documents(&path, skip_dir, documents)?;
            }
        } else if file_type.is_file()
            && local_images::core::is_html_output_path(&path.to_string_lossy())
        {
            documents.push(path);
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let env = match EnvConfig::from_env() {
        Ok(env) => env,
        Err(e) => {
            print_error_message(&e.to_string());
            process::exit(1);
        }
    };

    init_tracing(&env);
    tracing::debug!(?args, "CLI arguments parsed");

    let file_options = match &args.config {
        Some(path) => match PluginOptions::from_path(path) {
            Ok(options) => options,
            Err(e) => {
                print_error_message(&e.to_string());
                process::exit(1);
            }
        },
        None => PluginOptions::default(),
    };

    let plugin_options = file_options.with_env(&env).merge(args.plugin_options());

    let images = match LocalImages::register(&plugin_options) {
        Ok(images) => images,
        Err(e) => {
            print_error_message(&e.to_string());
            process::exit(1);
        }
    };

    let dist_path = images.options().dist_path.clone();
    let documents = match find_html_documents(&dist_path, &images.options().asset_dir()) {
        Ok(documents) => documents,
        Err(e) => {
            print_error_message(&format!(
                "Unable to read output directory {}: {}",
                dist_path.display(),
                e
            ));
            process::exit(1);
        }
    };

    let mut rewritten = 0;
    let mut failed = false;

    for document in &documents {
        let raw = match fs::read_to_string(document) {
            Ok(raw) => raw,
            Err(e) => {
                print_error_message(&format!("Unable to read {}: {}", document.display(), e));
                failed = true;
                continue;
            }
        };

        let output_path = document.to_string_lossy();
        let content = images.transform(&raw, &output_path).await;

        if content.as_ref() == raw.as_str() {
            continue;
        }

        match fs::write(document, content.as_bytes()) {
            Ok(()) => rewritten += 1,
            Err(e) => {
                print_error_message(&format!("Unable to write {}: {}", document.display(), e));
                failed = true;
            }
        }
    }

    print_info_message(&format!(
        "{}: rewrote {} of {} document(s)",
        images.name(),
        rewritten,
        documents.len()
    ));

    if failed {
        process::exit(1);
    }
}
