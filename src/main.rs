use clap::{Parser, Subcommand};
use sitewright::cache::{MemoryCache, Sitemap};
use sitewright::config::{self, TomlProvider};
use sitewright::page::{Page, Site};
use sitewright::stylesheet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "sitewright")]
#[command(about = "XML sitemap generator for content-tree sites")]
#[command(long_about = "\
XML sitemap generator for content-tree sites

The engine consumes a site manifest: a JSON document describing the page
tree (URLs, statuses, templates, translations, images) plus the optional
language set. It never crawls — the manifest is the whole truth.

Manifest shape:

  {
    \"languages\": { \"codes\": [\"en\", \"fr\"], \"default\": \"en\" },
    \"pages\": [
      {
        \"slug\": \"home\",
        \"url\": \"https://example.com/\",
        \"home_page\": true,
        \"template\": \"home\",
        \"content\": { \"updatedat\": \"2026-01-15\" },
        \"images\": [ { \"url\": \"https://example.com/hero.jpg\" } ],
        \"children\": []
      }
    ]
  }

Options (exclusion lists, cache TTL, homepage shim, ...) live in a TOML
file under the [sitewright] table; see the crate documentation for the
full key listing. Every option is opt-in: with no options file the whole
tree is mapped.")]
#[command(version = version_string())]
struct Cli {
    /// Site manifest (JSON) describing the page tree
    #[arg(long, default_value = "site.json", global = true)]
    site: PathBuf,

    /// TOML file with sitewright options
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the sitemap document
    Generate {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Annotate the document with debug comments
        #[arg(long)]
        debug: bool,
    },
    /// Print the XSL stylesheet to serve at /sitemap.xsl
    Stylesheet,
    /// Validate the site manifest without generating
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let provider = match &cli.options {
        Some(path) => TomlProvider::load(path)?,
        None => TomlProvider::default(),
    };

    match cli.command {
        Command::Generate { output, debug } => {
            if !config::enabled(&provider) {
                return Err("sitemap generation is disabled by configuration".into());
            }
            let site = load_site(&cli.site)?;
            let mut sitemap = Sitemap::new(provider, MemoryCache::new());
            if let Some(languages) = site.languages {
                sitemap = sitemap.with_languages(languages);
            }
            let doc = sitemap.document(&site.pages, debug);
            match output {
                Some(path) => {
                    std::fs::write(&path, &doc)?;
                    println!("Sitemap written to {}", path.display());
                }
                None => print!("{doc}"),
            }
        }
        Command::Stylesheet => {
            print!("{}", stylesheet::stylesheet(&provider));
        }
        Command::Check => {
            println!("==> Checking {}", cli.site.display());
            let site = load_site(&cli.site)?;
            let (pages, images) = count_tree(&site.pages);
            match &site.languages {
                Some(languages) => println!(
                    "{} pages, {} images, {} languages (default '{}')",
                    pages,
                    images,
                    languages.len(),
                    languages.default_code()
                ),
                None => println!("{pages} pages, {images} images, single-language"),
            }
            println!("==> Site manifest is valid");
        }
    }

    Ok(())
}

fn load_site(path: &Path) -> Result<Site, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Page and image counts over the whole tree.
fn count_tree(pages: &[Page]) -> (usize, usize) {
    let mut page_count = 0;
    let mut image_count = 0;
    for page in pages {
        page_count += 1;
        image_count += page.images.len();
        let (p, i) = count_tree(&page.children);
        page_count += p;
        image_count += i;
    }
    (page_count, image_count)
}
