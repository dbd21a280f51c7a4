use anyhow::{Context, Result};
use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use quire::build::build_site;
use quire::config::Config;
use quire::manage::{self, NewPost, PostUpdate};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = app().get_matches();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if matches.is_present("verbose") {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn app() -> App<'static, 'static> {
    let slug = Arg::with_name("slug")
        .long("slug")
        .takes_value(true)
        .required(true)
        .help("The slug of the post");

    App::new("quire")
        .version(crate_version!())
        .about("Manage markdown posts and build them into a static site")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("dir")
                .long("dir")
                .takes_value(true)
                .global(true)
                .help("The project directory (defaults to the current directory)"),
        )
        .arg(
            Arg::with_name("base-url")
                .long("base-url")
                .takes_value(true)
                .global(true)
                .help("The URL prefix for links (defaults to $BASE_URL)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .global(true)
                .help("Log progress"),
        )
        .subcommand(
            SubCommand::with_name("create")
                .about("Create a new post")
                .arg(
                    Arg::with_name("title")
                        .long("title")
                        .takes_value(true)
                        .required(true)
                        .help("The title of the post"),
                )
                .arg(
                    Arg::with_name("content")
                        .long("content")
                        .takes_value(true)
                        .required(true)
                        .help("The content of the post in Markdown"),
                )
                .arg(
                    Arg::with_name("tags")
                        .long("tags")
                        .takes_value(true)
                        .help("Comma-separated tags"),
                )
                .arg(
                    Arg::with_name("date")
                        .long("date")
                        .takes_value(true)
                        .help("The date of the post in YYYY-MM-DD format"),
                ),
        )
        .subcommand(
            SubCommand::with_name("delete")
                .about("Delete a post")
                .arg(slug.clone()),
        )
        .subcommand(
            SubCommand::with_name("update")
                .about("Update a post")
                .arg(slug)
                .arg(
                    Arg::with_name("title")
                        .long("title")
                        .takes_value(true)
                        .help("The new title of the post"),
                )
                .arg(
                    Arg::with_name("content")
                        .long("content")
                        .takes_value(true)
                        .help("The new content of the post in Markdown"),
                )
                .arg(
                    Arg::with_name("tags")
                        .long("tags")
                        .takes_value(true)
                        .help("The new comma-separated tags"),
                ),
        )
        .subcommand(SubCommand::with_name("build").about("Generate the site"))
}

fn run(matches: &ArgMatches) -> Result<()> {
    let (name, sub) = matches.subcommand();
    let sub = match sub {
        Some(sub) => sub,
        None => return Ok(()),
    };

    let dir = sub
        .value_of("dir")
        .or_else(|| matches.value_of("dir"))
        .unwrap_or(".");
    let base_url = sub
        .value_of("base-url")
        .or_else(|| matches.value_of("base-url"))
        .map(str::to_owned)
        .or_else(|| std::env::var("BASE_URL").ok());
    let config = Config::from_directory(Path::new(dir))?.with_base_url(base_url);

    match name {
        "create" => {
            let path = manage::create_post(
                &config.content_directory,
                NewPost {
                    title: sub.value_of("title").unwrap_or_default().to_owned(),
                    content: sub.value_of("content").unwrap_or_default().to_owned(),
                    tags: sub.value_of("tags").map(manage::parse_tags).unwrap_or_default(),
                    date: sub.value_of("date").map(str::to_owned),
                },
            )
            .context("Creating post")?;
            println!("Created post: {}", path.display());
        }
        "delete" => {
            let path = manage::delete_post(
                &config.content_directory,
                sub.value_of("slug").unwrap_or_default(),
            )
            .context("Deleting post")?;
            println!("Deleted post: {}", path.display());
        }
        "update" => {
            let path = manage::update_post(
                &config.content_directory,
                sub.value_of("slug").unwrap_or_default(),
                PostUpdate {
                    title: sub.value_of("title").map(str::to_owned),
                    content: sub.value_of("content").map(str::to_owned),
                    tags: sub.value_of("tags").map(manage::parse_tags),
                },
            )
            .context("Updating post")?;
            println!("Updated post: {}", path.display());
        }
        "build" => {
            let summary = build_site(&config).context("Generating site")?;
            println!(
                "Site generated successfully! ({} posts, {} documents in {})",
                summary.posts,
                summary.documents,
                config.output_directory.display()
            );
        }
        _ => unreachable!("clap rejects unknown subcommands"),
    }
    Ok(())
}
