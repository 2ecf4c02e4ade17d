//! Shape of the lowered tree for common cookbook constructs.

use cookbook_lint_core::{Node, NodeKind, NodeTag, SourceParser};
use cookbook_lint_ruby::RubyParser;

fn parse(src: &str) -> Node {
    RubyParser::new().parse(src).expect("source should parse")
}

fn find_call<'a>(tree: &'a Node, method: &str) -> &'a Node {
    tree.walk()
        .find(|n| n.method_name() == Some(method))
        .unwrap_or_else(|| panic!("no call to {method}"))
}

#[test]
fn command_call_with_string_argument() {
    let src = "depends 'poise'\n";
    let tree = parse(src);
    assert_eq!(tree.children.len(), 1);

    let call = &tree.children[0];
    assert!(call.is_command("depends"));
    assert_eq!(call.arguments().len(), 1);
    assert_eq!(call.first_string_arg(), Some("poise"));
    assert_eq!(&src[call.span.start..call.span.end], "depends 'poise'");
}

#[test]
fn parenthesized_call_with_receiver() {
    let src = "Mixlib::ShellOut.new('ls', timeout: 10)\n";
    let tree = parse(src);
    let call = find_call(&tree, "new");

    let receiver = call.receiver().expect("receiver");
    assert!(receiver.is_const_path(&["Mixlib", "ShellOut"]));
    assert_eq!(call.arguments().len(), 2);
    assert_eq!(call.first_string_arg(), Some("ls"));
    let method = call.method_span().unwrap();
    assert_eq!(&src[method.start..method.end], "new");
}

#[test]
fn bang_method_names_keep_suffix() {
    let tree = parse("shell_out_compact!('ls')\n");
    let call = find_call(&tree, "shell_out_compact!");
    assert!(call.receiver().is_none());
}

#[test]
fn namespaced_constant_in_chain() {
    let src = "runner = ChefSpec::Runner.new.converge('web::default')\n";
    let tree = parse(src);
    let konst = tree
        .walk()
        .find(|n| n.is_const_path(&["ChefSpec", "Runner"]))
        .expect("ChefSpec::Runner constant");
    assert_eq!(&src[konst.span.start..konst.span.end], "ChefSpec::Runner");

    let converge = find_call(&tree, "converge");
    assert_eq!(converge.first_string_arg(), Some("web::default"));
}

#[test]
fn rooted_constant_has_no_relative_path() {
    let tree = parse("::ChefSpec::Runner.new\n");
    let konst = tree
        .walk()
        .find(|n| matches!(&n.kind, NodeKind::Const { name, .. } if name == "Runner"))
        .expect("Runner constant");
    assert_eq!(konst.const_path(), None);
}

#[test]
fn do_block_wraps_call_and_body() {
    let src = "registry_key 'Set UAC' do\n  key 'HKLM\\SOFTWARE'\n  action :create\nend\n";
    let tree = parse(src);
    let block = &tree.children[0];
    assert_eq!(block.tag(), NodeTag::Block);
    assert_eq!(block.span.start, 0);
    assert_eq!(block.span.end, src.trim_end().len());

    let call = block.block_call().expect("attached call");
    assert!(call.is_command("registry_key"));
    assert_eq!(&src[call.span.start..call.span.end], "registry_key 'Set UAC'");

    let body: Vec<_> = block
        .block_body()
        .iter()
        .filter_map(Node::method_name)
        .collect();
    assert_eq!(body, vec!["key", "action"]);
    let key = &block.block_body()[0];
    assert_eq!(key.first_string_arg(), Some("HKLM\\SOFTWARE"));
}

#[test]
fn brace_block_with_parameters() {
    let tree = parse("items.each { |i| puts i }\n");
    let block = &tree.children[0];
    assert_eq!(block.tag(), NodeTag::Block);
    assert_eq!(block.block_call().and_then(Node::method_name), Some("each"));
    assert_eq!(block.block_body().len(), 1);
}

#[test]
fn call_without_block_inside_block_argument() {
    let src = "describe registry_key('HKLM\\Software') do\n  it { should exist }\nend\n";
    let tree = parse(src);
    let outer = &tree.children[0];
    assert_eq!(outer.block_call().and_then(Node::method_name), Some("describe"));

    let inner = find_call(&tree, "registry_key");
    assert_eq!(inner.tag(), NodeTag::Call);
    assert_eq!(inner.first_string_arg(), Some("HKLM\\Software"));
}

#[test]
fn double_quoted_strings_unescape() {
    let tree = parse("key \"HKLM\\\\SOFTWARE\\\\Policies\"\n");
    let call = find_call(&tree, "key");
    assert_eq!(call.first_string_arg(), Some("HKLM\\SOFTWARE\\Policies"));
}

#[test]
fn interpolated_strings_are_not_literals() {
    let tree = parse("require \"#{name}-vault\"\n");
    let call = find_call(&tree, "require");
    assert_eq!(call.arguments().len(), 1);
    assert_eq!(call.first_string_arg(), None);
    assert_eq!(call.arguments()[0].tag(), NodeTag::Other);
}

#[test]
fn comments_are_preserved() {
    let src = "#\n# Copyright:: 2019, Chef Software, Inc.\n#\nname 'web'\n";
    let tree = parse(src);
    let comments: Vec<_> = tree.walk().filter_map(Node::comment_text).collect();
    assert_eq!(
        comments,
        vec!["#", "# Copyright:: 2019, Chef Software, Inc.", "#"]
    );
}

#[test]
fn bare_identifier_is_a_call_unless_bound() {
    let src = "x = shell_out_with_systems_locale\nputs x\n";
    let tree = parse(src);
    let call = find_call(&tree, "shell_out_with_systems_locale");
    assert!(call.is_command("shell_out_with_systems_locale"));
    assert!(call.arguments().is_empty());
    assert_eq!(&src[call.span.start..call.span.end], "shell_out_with_systems_locale");

    assert!(tree.walk().all(|n| n.method_name() != Some("x")));
}

#[test]
fn parameters_and_definitions_are_not_calls() {
    let src = "def shell_out_compact(cmd, opts = {})\n  run(cmd, opts)\nend\nitems.each { |item| item }\n";
    let tree = parse(src);
    let names: Vec<_> = tree.walk().filter_map(Node::method_name).collect();
    assert_eq!(names, vec!["run", "each", "items"]);
}
