use clap::Parser;
use gitup::commands::{run_command, update_bookmarks, update_directories, UpdateOptions};
use gitup::core::{bookmarks, output, walker};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitup")]
#[command(about = "Easily update multiple git repositories at once")]
#[command(version)]
#[command(
    after_help = "Both relative and absolute paths are accepted by all arguments. \
                  Bookmarked paths are updated by default when no paths are given."
)]
struct Cli {
    /// Update this repository, or all repositories it contains (if not a repo directly)
    #[arg(value_name = "path")]
    directories_to_update: Vec<String>,

    /// Update all bookmarks (default behavior when called without arguments)
    #[arg(short = 'u', long = "update")]
    update: bool,

    /// Max recursion depth when searching for repos in subdirectories
    /// (use 0 for no recursion, or -1 for unlimited)
    #[arg(
        short = 't',
        long = "depth",
        value_name = "n",
        default_value_t = 3,
        allow_hyphen_values = true
    )]
    max_depth: i32,

    /// Only fetch the remote tracked by the current branch instead of all remotes
    #[arg(short = 'c', long = "current-only")]
    current_only: bool,

    /// Only fetch remotes, don't try to fast-forward any branches
    #[arg(short = 'f', long = "fetch-only")]
    fetch_only: bool,

    /// After fetching, delete remote-tracking branches that no longer exist on their remote
    #[arg(short = 'p', long = "prune")]
    prune: bool,

    /// Add directory(s) as bookmarks
    #[arg(short = 'a', long = "add", value_name = "path", num_args = 1..)]
    bookmarks_to_add: Vec<String>,

    /// Delete bookmark(s) (leaves actual directories alone)
    #[arg(short = 'd', long = "delete", value_name = "path", num_args = 1..)]
    bookmarks_to_del: Vec<String>,

    /// List current bookmarks
    #[arg(short = 'l', long = "list")]
    list_bookmarks: bool,

    /// Delete any bookmarks that don't exist
    #[arg(short = 'n', long = "clean", visible_alias = "cleanup")]
    clean_bookmarks: bool,

    /// Use a specific bookmark config file
    #[arg(short = 'b', long = "bookmark-file", value_name = "path")]
    bookmark_file: Option<String>,

    /// Run a shell command on all repos
    #[arg(short = 'e', long = "exec", visible_alias = "batch", value_name = "command")]
    command: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    }
    env_logger::init();

    ctrlc::set_handler(|| {
        println!("\nStopped by user.");
        std::process::exit(1);
    })
    .ok();

    output::print_banner();

    let bookmark_file: Option<PathBuf> = cli.bookmark_file.as_deref().map(walker::expand_home);
    let bookmark_file = bookmark_file.as_deref();

    let opts = UpdateOptions {
        current_only: cli.current_only,
        fetch_only: cli.fetch_only,
        prune: cli.prune,
        max_depth: cli.max_depth,
    };

    let mut acted = false;
    if !cli.bookmarks_to_add.is_empty() {
        report(bookmarks::add(&cli.bookmarks_to_add, bookmark_file));
        acted = true;
    }
    if !cli.bookmarks_to_del.is_empty() {
        report(bookmarks::delete(&cli.bookmarks_to_del, bookmark_file));
        acted = true;
    }
    if cli.list_bookmarks {
        report(bookmarks::list(bookmark_file));
        acted = true;
    }
    if cli.clean_bookmarks {
        report(bookmarks::clean(bookmark_file));
        acted = true;
    }

    let load_bookmarks = || match bookmarks::load(bookmark_file) {
        Ok(bookmarks) => bookmarks,
        Err(err) => {
            output::print_error(&err.to_string());
            Vec::new()
        }
    };

    if let Some(command) = &cli.command {
        if !cli.directories_to_update.is_empty() {
            run_command(&cli.directories_to_update, command, cli.max_depth);
        }
        if cli.update || cli.directories_to_update.is_empty() {
            run_command(&load_bookmarks(), command, cli.max_depth);
        }
    } else {
        if !cli.directories_to_update.is_empty() {
            update_directories(&cli.directories_to_update, &opts);
            acted = true;
        }
        if cli.update || !acted {
            update_bookmarks(&load_bookmarks(), &opts);
        }
    }
}

fn report(result: gitup::Result<()>) {
    if let Err(err) = result {
        output::print_error(&err.to_string());
    }
}
