use std::{sync::atomic::AtomicBool, time::Duration};

use clap::{Arg, ArgMatches, Command};
use clsrv::{probe, run_all, send, serve, BoxResult, Scenario};
use lzmq::{version, Context, InitArgs};
use tracing::{info, Level};

fn cli() -> Command<'static> {
  let endpoint = || Arg::new("endpoint").required(true).help("zmq endpoint, e.g. tcp://127.0.0.1:5555");
  let delay = || {
    Arg::new("delay")
      .long("delay")
      .takes_value(true)
      .default_value("1000")
      .help("milliseconds the client waits before closing")
  };

  Command::new("clsrv")
    .about("PAIR socket demo and zmq error indicator probe")
    .subcommand_required(true)
    .arg(
      Arg::new("io-threads")
        .long("io-threads")
        .takes_value(true)
        .global(true)
        .help("zmq io threads, defaults to LZMQ_IO_THREADS or 1"),
    )
    .arg(Arg::new("verbose").short('v').long("verbose").global(true).help("debug logging"))
    .subcommand(
      Command::new("srv")
        .about("bind and print received frames")
        .arg(endpoint())
        .arg(Arg::new("count").long("count").takes_value(true).default_value("2")),
    )
    .subcommand(Command::new("cl").about("connect and send the demo frames").arg(endpoint()).arg(delay()))
    .subcommand(Command::new("all").about("server and client in one process").arg(endpoint()).arg(delay()))
    .subcommand(
      Command::new("probe")
        .about("trigger a failure and read the error indicator")
        .arg(Arg::new("scenario").possible_values(["none", "bad-endpoint", "recv-state", "would-block", "all"]).default_value("all")),
    )
    .subcommand(Command::new("version").about("print the linked libzmq version"))
}

fn init_logging(verbose: bool) {
  let level = if verbose { Level::DEBUG } else { Level::INFO };

  tracing_subscriber::fmt()
    .with_max_level(level)
    .with_target(false)
    .without_time()
    .init();
}

fn init_args(matches: &ArgMatches) -> BoxResult<InitArgs> {
  let mut args = InitArgs::from_env();

  if let Some(io_threads) = matches.value_of("io-threads") {
    args.io_threads = io_threads.parse()?;
  }

  Ok(args)
}

fn delay(matches: &ArgMatches) -> BoxResult<Duration> {
  let millis = matches.value_of("delay").unwrap_or("0").parse()?;

  Ok(Duration::from_millis(millis))
}

fn main() -> BoxResult<()> {
  let matches = cli().get_matches();

  init_logging(matches.is_present("verbose"));

  let (subcommand, sub_matches) = match matches.subcommand() {
    Some(subcommand) => subcommand,
    None => return Ok(()),
  };

  if subcommand == "version" {
    let (major, minor, patch) = version();

    println!("libzmq {}.{}.{}", major, minor, patch);

    return Ok(());
  }

  let context = Context::new(init_args(&matches)?)?;

  match subcommand {
    "srv" => {
      let endpoint = sub_matches.value_of("endpoint").unwrap_or_default();
      let count = sub_matches.value_of("count").unwrap_or("2").parse()?;

      for frame in serve(&context, endpoint, count, None, &AtomicBool::new(false))? {
        println!("{}", String::from_utf8_lossy(&frame));
      }
    }
    "cl" => {
      let endpoint = sub_matches.value_of("endpoint").unwrap_or_default();

      send(&context, endpoint, &clsrv::demo_frames(), delay(sub_matches)?)?;
    }
    "all" => {
      let endpoint = sub_matches.value_of("endpoint").unwrap_or_default();

      for frame in run_all(&context, endpoint, delay(sub_matches)?)? {
        println!("{}", String::from_utf8_lossy(&frame));
      }
    }
    "probe" => {
      let scenarios = match sub_matches.value_of("scenario").unwrap_or("all") {
        "all" => Scenario::ALL.to_vec(),
        name => vec![name.parse::<Scenario>()?],
      };

      for scenario in scenarios {
        println!("{}", probe(&context, scenario)?);
      }
    }
    _ => unreachable!("subcommand_required"),
  }

  info!("main: finished");

  context.terminate()?;

  Ok(())
}
