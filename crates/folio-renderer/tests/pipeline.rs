//! Parse-then-render pipelines across syntaxes.

use folio_parser::Parser;
use folio_renderer::{RegistryError, RendererRegistry};
use folio_tree::SyntaxId;
use pretty_assertions::assert_eq;

const WIKI_SOURCE: &str = "= Guide =\n\
\n\
Read the **intro** and [[the API>>https://example.com/api]].\n\
Then see [[Main.WebHome]] or [[oops>>{{broken}}]].\n\
\n\
* first\n\
* second\n\
\n\
{{code language=\"sh\"}}\n\
echo hi\n\
{{/code}}";

#[test]
fn test_wiki_to_wiki_round_trip() {
    let parser = Parser::with_defaults();
    let registry = RendererRegistry::with_defaults();

    let tree = parser.parse(WIKI_SOURCE, &SyntaxId::wiki()).unwrap();
    let rendered = registry.render(&SyntaxId::wiki(), &tree).unwrap();
    let reparsed = parser.parse(&rendered, &SyntaxId::wiki()).unwrap();

    assert_eq!(reparsed, tree);
}

#[test]
fn test_wiki_to_html() {
    let parser = Parser::with_defaults();
    let registry = RendererRegistry::with_defaults();

    let tree = parser.parse(WIKI_SOURCE, &SyntaxId::wiki()).unwrap();
    let html = registry.render(&SyntaxId::html(), &tree).unwrap();

    assert_eq!(
        html,
        "<h1>Guide</h1>\n\
         <p>Read the <strong>intro</strong> and <a href=\"https://example.com/api\">the API</a>.<br>\
         Then see <a href=\"Main.WebHome\">Main.WebHome</a> or \
         <span class=\"wikilink-broken\">oops</span>.</p>\n\
         <ul>\n<li>first</li>\n<li>second</li>\n</ul>\n\
         <pre><code class=\"language-sh\">echo hi</code></pre>"
    );
}

#[test]
fn test_plain_output_is_lossy() {
    let parser = Parser::with_defaults();
    let registry = RendererRegistry::with_defaults();

    let tree = parser.parse(WIKI_SOURCE, &SyntaxId::wiki()).unwrap();
    let plain = registry.render(&SyntaxId::plain(), &tree).unwrap();
    assert_eq!(
        plain,
        "Guide\n\n\
         Read the intro and the API.\nThen see Main.WebHome or oops.\n\n\
         first\nsecond\n\n\
         echo hi"
    );

    let reparsed = parser.parse(&plain, &SyntaxId::plain()).unwrap();
    assert_ne!(reparsed, tree);
}

#[test]
fn test_markdown_to_wiki() {
    let parser = Parser::with_defaults();
    let registry = RendererRegistry::with_defaults();

    let tree = parser
        .parse("## Title\n\nSome *em* and `code`.", &SyntaxId::markdown())
        .unwrap();
    let wiki = registry.render(&SyntaxId::wiki(), &tree).unwrap();
    assert_eq!(wiki, "== Title ==\n\nSome //em// and ##code##.");
}

#[test]
fn test_unknown_target_syntax() {
    let parser = Parser::with_defaults();
    let registry = RendererRegistry::with_defaults();
    let tree = parser.parse("x", &SyntaxId::plain()).unwrap();

    let syntax: SyntaxId = "html/9.9".parse().unwrap();
    let err = registry.render(&syntax, &tree).unwrap_err();
    assert_eq!(err, RegistryError::NotFound(syntax));
}
