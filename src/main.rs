use anyhow::Result;
use appseed::appseed_error::AppseedError;
use appseed::cli::{parse_args, Cli, Commands};
use appseed::commands::{self, ServeOverrides};
use appseed::config::{load_config, load_config_file, AppseedConfig};
use appseed::humanize::{bytes_to_size, humanize_ms};
use appseed::ident;
use appseed::launch::{CodeSnippet, LaunchContext, LaunchParams, WindowOptions};
use appseed::observability::{init_logging, install_panic_hook, set_phase_persistent, RunPhase};

fn main() {
    install_panic_hook();
    let cli = parse_args();
    init_logging(cli.log_level.as_deref());
    set_phase_persistent(RunPhase::Startup);

    if let Err(err) = run(cli) {
        let code = match err.downcast_ref::<AppseedError>() {
            Some(appseed_err) => appseed_err.exit_code(),
            None => 1,
        };
        eprintln!("Error: {:#}", err);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => load_config(),
    };

    match cli.command {
        Commands::Serve { host, port, root } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(commands::handle_serve(
                config,
                ServeOverrides { host, port, root },
            ))
        }
        Commands::Init { force } => commands::init_config(force),
        Commands::Uuid { count } => {
            for _ in 0..count {
                println!("{}", ident::uuid());
            }
            Ok(())
        }
        command @ Commands::LaunchUrl { .. } => handle_launch_url(&config, command),
        Commands::Humanize { value, bytes, si } => {
            if bytes {
                println!("{}", bytes_to_size(value, si));
            } else {
                println!("{}", humanize_ms(value));
            }
            Ok(())
        }
    }
}

fn handle_launch_url(config: &AppseedConfig, command: Commands) -> Result<()> {
    let Commands::LaunchUrl {
        url,
        empty,
        test_name,
        code,
        code_om,
        function,
        frame,
        headers,
        json,
    } = command
    else {
        return Ok(());
    };

    if function && code.is_none() && code_om.is_none() {
        return Err(
            AppseedError::cli_invalid_arg("--function", "requires --code or --code-om").into(),
        );
    }

    let test_name = test_name.unwrap_or_else(|| config.launch.test_name.clone());
    let ctx = LaunchContext::new(&config.launch.origin, &test_name);
    let snippet = |text: String| {
        if function {
            CodeSnippet::Function(text)
        } else {
            CodeSnippet::Source(text)
        }
    };

    let params = LaunchParams {
        url: url.or_else(|| empty.then(|| ctx.empty_url())),
        code: code.map(snippet),
        code_om: code_om.map(snippet),
        frame,
        response_headers: headers.into_iter().collect(),
    };

    if json {
        let window = WindowOptions::for_launch(&ctx, &params).normalized();
        println!("{}", serde_json::to_string_pretty(&window)?);
    } else {
        println!("{}", params.launch_url(&ctx));
    }
    Ok(())
}
