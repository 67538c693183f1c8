use compact_js::emit::EmitOptions;
use compact_js::minify;
use compact_js::minify::MinifyOptions;
use compact_js::minify::Pass;
use log::LevelFilter;
use std::fs::File;
use std::io::stdin;
use std::io::stdout;
use std::io::Read;
use std::io::Write;
use structopt::StructOpt;

mod logger;

#[derive(StructOpt)]
#[structopt(
  name = "compact-js",
  about = "Source-to-source compressor for classic JavaScript"
)]
struct Cli {
  /// File to compress; omit for stdin.
  #[structopt(parse(from_os_str))]
  input: Option<std::path::PathBuf>,

  /// Output destination; omit for stdout.
  #[structopt(short, long, parse(from_os_str))]
  output: Option<std::path::PathBuf>,

  /// Run only these named passes, in order, instead of the default pipeline.
  #[structopt(long, use_delimiter = true)]
  passes: Option<Vec<String>>,

  /// Drop these named passes from the pipeline.
  #[structopt(long, use_delimiter = true)]
  skip: Vec<String>,

  /// Keep the comment text ahead of the first token.
  #[structopt(long)]
  keep_leading_comments: bool,

  /// Log each pass as it runs.
  #[structopt(short, long)]
  verbose: bool,
}

fn parse_pass(name: &str) -> Pass {
  match Pass::from_name(name) {
    Some(pass) => pass,
    None => {
      eprintln!("unknown pass: {}", name);
      std::process::exit(2);
    }
  }
}

fn main() {
  let args = Cli::from_args();
  let level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Warn
  };
  logger::init(level).expect("install logger");

  let mut passes = match &args.passes {
    Some(names) => names.iter().map(|n| parse_pass(n)).collect(),
    None => MinifyOptions::default().passes,
  };
  let skip: Vec<Pass> = args.skip.iter().map(|n| parse_pass(n)).collect();
  passes.retain(|p| !skip.contains(p));
  let minify_options = MinifyOptions { passes };
  let emit_options = EmitOptions {
    preserve_leading_comments: args.keep_leading_comments,
  };

  let mut input = Vec::new();
  let mut input_file: Box<dyn Read> = match args.input {
    Some(p) => Box::new(File::open(p).expect("open input file")),
    None => Box::new(stdin()),
  };
  input_file.read_to_end(&mut input).expect("read input");

  let mut output = Vec::new();
  if let Err(err) = minify(input, &mut output, &minify_options, &emit_options) {
    eprintln!("{}", err);
    std::process::exit(1);
  };
  let mut out_file: Box<dyn Write> = match args.output {
    Some(p) => Box::new(File::create(p).expect("open output file")),
    None => Box::new(stdout()),
  };
  out_file.write_all(&output).expect("write output");
}
