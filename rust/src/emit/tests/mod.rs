use crate::emit::emit_js;
use crate::emit::emit_number;
use crate::emit::emit_string;
use crate::emit::EmitOptions;
use crate::lex::Lexer;
use crate::minify::MinifyOptions;
use crate::minify::Pass;
use crate::parse::parser::Parser;
use crate::parse::toplevel::parse_top_level;

// Parse then emit, with no rewrites in between.
fn check_emit(src: &str, expected: &str) {
  let mut parser = Parser::new(Lexer::new(src.as_bytes().to_vec()));
  let parsed = parse_top_level(&mut parser).unwrap();
  let (map, _) = parser.take();
  let mut out = Vec::<u8>::new();
  emit_js(&mut out, &map, parsed.top_level_node_id);
  assert_eq!(String::from_utf8(out).unwrap(), expected);
}

fn minify_with(src: &str, options: &MinifyOptions) -> String {
  let mut out = Vec::<u8>::new();
  crate::minify(
    src.as_bytes().to_vec(),
    &mut out,
    options,
    &EmitOptions::default(),
  )
  .unwrap();
  String::from_utf8(out).unwrap()
}

fn check_minified(src: &str, expected: &str) {
  assert_eq!(minify_with(src, &MinifyOptions::default()), expected);
}

#[test]
fn test_statement_separation() {
  check_emit("a();b()", "a();b()");
  check_emit("{a()}b()", "{a()}b()");
  check_emit("function f(){}g()", "function f(){}g()");
}

#[test]
fn test_keyword_spacing() {
  check_emit("function f(){return !a}", "function f(){return!a}");
  check_emit("function f(){return a}", "function f(){return a}");
  check_emit("throw new Error(x)", "throw new Error(x)");
  check_emit("for(var k in o)f(k)", "for(var k in o)f(k)");
  check_emit("x=typeof a", "x=typeof a");
  check_emit("x=typeof !a", "x=typeof!a");
}

#[test]
fn test_new_keyword_spacing() {
  check_emit("x=new Date()", "x=new Date()");
  check_emit("x=new a.b(c)", "x=new a.b(c)");
  check_emit("x=new (a())()", "x=new(a())()");
}

#[test]
fn test_unary_operators_do_not_merge() {
  check_emit("x=a- -b", "x=a- -b");
  check_emit("x=- -a", "x=- -a");
  check_emit("x=a+ +b", "x=a+ +b");
}

#[test]
fn test_dangling_if_gets_braces() {
  check_emit(
    "if(a){if(b)c()}else d()",
    "if(a){if(b)c()}else d()"
  );
  check_emit("if(a)b();else c()", "if(a)b();else c()");
}

#[test]
fn test_booleans_render_as_negated_numbers() {
  check_emit("x=true;y=false", "x=!0;y=!1");
  check_emit("x=true&&y", "x=!0&&y");
}

#[test]
fn test_number_rendering() {
  let render = |value: f64| {
    let mut out = Vec::<u8>::new();
    emit_number(&mut out, value);
    String::from_utf8(out).unwrap()
  };
  assert_eq!(render(0.5), ".5");
  assert_eq!(render(-0.25), "-.25");
  assert_eq!(render(1000.0), "1e3");
  assert_eq!(render(100.0), "100");
  assert_eq!(render(1e21), "1e21");
  assert_eq!(render(255.0), "255");
}

#[test]
fn test_string_rendering() {
  let render = |value: &str| {
    let mut out = Vec::<u8>::new();
    emit_string(&mut out, value);
    String::from_utf8(out).unwrap()
  };
  assert_eq!(render("plain"), "\"plain\"");
  assert_eq!(render("say \"hi\""), "'say \"hi\"'");
  assert_eq!(render("it's"), "\"it's\"");
  assert_eq!(render("a\nb"), "\"a\\nb\"");
}

#[test]
fn test_vars_consolidate() {
  check_minified("a=1;b=1;var c,b,a;", "var a=1,b=1,c");
}

#[test]
fn test_returns_collapse() {
  check_minified(
    "function f(a,b,c){if(a)return b;return c}",
    "function f(a,b,c){return a?b:c}"
  );
}

#[test]
fn test_constants_simplify() {
  let options = MinifyOptions {
    passes: vec![Pass::FoldConstants],
  };
  assert_eq!(
    minify_with("true;false;if(1)a;if(0)a;if(0)a;else b;while(1);", &options),
    "!0;!1;a;b;for(;;);"
  );
}

#[test]
fn test_nested_ifs_join() {
  check_minified("while(c){if(a)if(b)break}", "while(c)if(a&&b)break");
}

#[test]
fn test_nested_closures_rename_without_collisions() {
  let src =
    "function outer(){var firstLocal=1;function inner(){var secondLocal=2;return firstLocal+secondLocal}return inner()}";
  let out = minify_with(src, &MinifyOptions::default());
  assert_eq!(
    out,
    "function outer(){function b(){var b=2;return a+b}var a=1;return b()}"
  );
  assert!(out.len() < src.len());
}

#[test]
fn test_shadowed_references_stay_consistent() {
  check_minified(
    "function f(item){function g(item){return item}return g(item)}",
    "function f(a){function b(a){return a}return b(a)}"
  );
}

#[test]
fn test_second_run_is_a_noop() {
  let src = "function compute(first,second){var total=first+second;if(total)return total;return 0}compute(1,2);";
  let once = minify_with(src, &MinifyOptions::default());
  let twice = minify_with(&once, &MinifyOptions::default());
  assert_eq!(once, twice);
}

#[test]
fn test_pass_subsets_run_independently() {
  let options = MinifyOptions {
    passes: vec![Pass::TidyBlocks],
  };
  assert_eq!(
    minify_with("{a();{b()}}if(c){d()}", &options),
    "a();b();if(c)d()"
  );
}
