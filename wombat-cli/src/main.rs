//! Wombat CLI - headless page inspector
//!
//! Loads a page, runs it through the whole pipeline and prints one stage of
//! the result, or renders it to a PNG.
//!
//! - wombat page.html                 # Summary: DOM tree, rules, parse issues
//! - wombat --dump layout page.html   # Box tree with geometry
//! - wombat -S out.png URL            # Screenshot

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};
use wombat_browser::{NetLoader, Page, Renderer, SystemFonts, load_font_metrics};
use wombat_common::warning::{set_warnings_enabled, warn_once};
use wombat_css::{BoxId, BoxKind, DisplayCommand, FontCache, LayoutTree, PaintOptions, Viewport};
use wombat_dom::{DomTree, NodeId, NodeType};
use wombat_html::print_tree;

/// Which pipeline stage to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dump {
    /// The parsed DOM tree.
    Dom,
    /// Computed styles of every element.
    Styles,
    /// The layout box tree.
    Layout,
    /// The display list.
    Paint,
}

/// Wombat - parse, style, lay out and paint a web page without a window
#[derive(Parser, Debug)]
#[command(name = "wombat")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Summarize a local file
    wombat ./index.html

    # Print the layout tree as JSON
    wombat --dump layout --json https://example.com

    # Take a screenshot scrolled to an anchor
    wombat -S shot.png --scroll '#install' https://example.com

    # Narrow viewport with block outlines
    wombat -S narrow.png --width 320 --outline-boxes ./index.html

    # Parse inline HTML
    wombat --dump dom --html '<p>one<p>two'
"#)]
struct Cli {
    /// Path to HTML file or URL to open
    #[arg(value_name = "FILE|URL")]
    path: Option<String>,

    /// Parse HTML string directly instead of file/URL
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Print one stage of the pipeline instead of the summary
    #[arg(long, value_enum, value_name = "STAGE")]
    dump: Option<Dump>,

    /// Print the dump as JSON
    #[arg(long)]
    json: bool,

    /// Take a screenshot and save to the specified file (PNG format)
    #[arg(short = 'S', long, value_name = "FILE")]
    screenshot: Option<PathBuf>,

    /// Scroll offset for the screenshot: pixels, or `#id` of an element
    #[arg(long, value_name = "PX|#ID")]
    scroll: Option<String>,

    /// Stroke an outline around every block box
    #[arg(long)]
    outline_boxes: bool,

    /// Viewport width
    #[arg(long, default_value = "800")]
    width: u32,

    /// Viewport height
    #[arg(long, default_value = "600")]
    height: u32,

    /// Horizontal page margin
    #[arg(long, default_value = "13")]
    hstep: f32,

    /// Vertical page margin
    #[arg(long, default_value = "18")]
    vstep: f32,

    /// Do not print engine warnings
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.quiet {
        set_warnings_enabled(false);
    }

    #[allow(clippy::cast_precision_loss)]
    let viewport = Viewport {
        width: cli.width as f32,
        height: cli.height as f32,
        hstep: cli.hstep,
        vstep: cli.vstep,
    };

    let fonts = SystemFonts::load();
    let metrics = load_font_metrics(fonts.as_ref());
    let mut cache = FontCache::new(&*metrics);
    let loader = NetLoader::new();

    let mut page = if let Some(ref html) = cli.html {
        Page::from_html(html, None, &loader, &mut cache, viewport)
    } else if let Some(ref path) = cli.path {
        Page::load(path, &loader, &mut cache, viewport)
            .with_context(|| format!("failed to load {path}"))?
    } else {
        bail!("nothing to open: pass a file path, a URL or --html");
    };

    if cli.outline_boxes {
        page.set_paint_options(PaintOptions {
            outline_boxes: true,
        });
    }

    if let Some(ref output_path) = cli.screenshot {
        let scroll = resolve_scroll(&page, cli.scroll.as_deref())?;
        let mut renderer = Renderer::new(cli.width, cli.height, fonts.as_ref());
        renderer.render(page.display_list(), scroll);
        renderer.save(output_path)?;
        println!("Screenshot saved to: {}", output_path.display());
        return Ok(());
    }

    match (cli.dump, cli.json) {
        (None, _) => print_summary(&page),
        (Some(Dump::Dom), false) => print_tree(page.dom(), page.dom().root(), 0),
        (Some(Dump::Dom), true) => print_json(&node_to_json(page.dom(), page.dom().root()))?,
        (Some(Dump::Styles), false) => print_styles(page.dom()),
        (Some(Dump::Styles), true) => print_json(&styles_to_json(page.dom()))?,
        (Some(Dump::Layout), false) => {
            if !page.layout().is_empty() {
                print_layout(page.layout(), BoxId(0), 0);
            }
        }
        (Some(Dump::Layout), true) => print_json(&serde_json::to_value(page.layout())?)?,
        (Some(Dump::Paint), false) => print_display_list(&page),
        (Some(Dump::Paint), true) => print_json(&serde_json::to_value(page.display_list())?)?,
    }
    Ok(())
}

/// Turn `--scroll` into a page offset. Without it the URL fragment decides;
/// an unknown fragment scrolls to the top.
fn resolve_scroll(page: &Page, scroll: Option<&str>) -> Result<f32> {
    let Some(scroll) = scroll else {
        return Ok(page.initial_scroll());
    };
    if scroll.starts_with('#') {
        return Ok(page.scroll_to_fragment(scroll).unwrap_or_else(|| {
            warn_once("CLI", &format!("no element with id '{scroll}', not scrolling"));
            0.0
        }));
    }
    scroll
        .parse::<f32>()
        .with_context(|| format!("invalid scroll offset '{scroll}'"))
}

fn print_summary(page: &Page) {
    println!("{}", "=== DOM Tree ===".bold());
    print_tree(page.dom(), page.dom().root(), 0);

    println!("\n{}", "=== Stylesheets ===".bold());
    for href in page.stylesheet_links() {
        println!("  {}", href.blue());
    }
    println!("{} rules", page.rules().len());

    println!("\n{}", "=== Layout ===".bold());
    println!(
        "{} boxes, document height {:.1}px",
        page.layout().len(),
        page.document_height()
    );
    println!("{} draw commands", page.display_list().len());

    if !page.issues().is_empty() {
        println!("\n{}", "=== Parse Issues ===".bold());
        for issue in page.issues() {
            println!(
                "  - {} {}",
                issue.message,
                format!("(token {})", issue.token_index).dimmed()
            );
        }
    }
}

fn print_styles(dom: &DomTree) {
    for id in dom.iter_all() {
        let Some(element) = dom.as_element(id) else {
            continue;
        };
        let depth = dom.ancestors(id).count();
        let indent = "  ".repeat(depth);
        println!("{indent}{}", format!("<{}>", element.tag_name).cyan());
        for (property, value) in dom.style(id).iter() {
            println!("{indent}  {}: {value}", property.green());
        }
    }
}

fn print_layout(tree: &LayoutTree, id: BoxId, depth: usize) {
    let Some(layout_box) = tree.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let geometry = format!(
        "x={:.1} y={:.1} w={:.1} h={:.1}",
        layout_box.x, layout_box.y, layout_box.width, layout_box.height
    );
    match &layout_box.kind {
        BoxKind::Document { .. } => println!("{indent}{} {}", "Document".magenta(), geometry.dimmed()),
        BoxKind::Block { nodes } => println!(
            "{indent}{} {} {}",
            "Block".cyan(),
            format!("({} nodes)", nodes.len()).dimmed(),
            geometry.dimmed()
        ),
        BoxKind::Line { .. } => println!("{indent}{} {}", "Line".blue(), geometry.dimmed()),
        BoxKind::Text { word, font, .. } => println!(
            "{indent}{} {word:?} [{font}] {}",
            "Text".green(),
            geometry.dimmed()
        ),
    }
    for &child in tree.children(id) {
        print_layout(tree, child, depth + 1);
    }
}

fn print_display_list(page: &Page) {
    for command in page.display_list() {
        match command {
            DisplayCommand::Text {
                x, y, text, color, ..
            } => println!("{} ({x:.1}, {y:.1}) {text:?} {color}", "text".green()),
            DisplayCommand::Rect { rect, color } => println!(
                "{} ({:.1}, {:.1})-({:.1}, {:.1}) {color}",
                "rect".cyan(),
                rect.left,
                rect.top,
                rect.right,
                rect.bottom
            ),
            DisplayCommand::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                thickness,
                ..
            } => println!(
                "{} ({x1:.1}, {y1:.1})-({x2:.1}, {y2:.1}) {color} {thickness}px",
                "line".yellow()
            ),
            DisplayCommand::Outline {
                rect,
                color,
                thickness,
            } => println!(
                "{} ({:.1}, {:.1})-({:.1}, {:.1}) {color} {thickness}px",
                "outline".red(),
                rect.left,
                rect.top,
                rect.right,
                rect.bottom
            ),
        }
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn node_to_json(dom: &DomTree, id: NodeId) -> Value {
    let mut obj = Map::new();
    let Some(node) = dom.get(id) else {
        return Value::Object(obj);
    };

    match &node.node_type {
        NodeType::Element(data) => {
            let _ = obj.insert("type".to_string(), json!("element"));
            let _ = obj.insert("tagName".to_string(), json!(data.tag_name));

            let attrs: Map<String, Value> = data
                .attrs
                .iter()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect();
            let _ = obj.insert("attributes".to_string(), Value::Object(attrs));

            if !node.style.is_empty()
                && let Ok(style_json) = serde_json::to_value(&node.style)
            {
                let _ = obj.insert("computedStyle".to_string(), style_json);
            }
        }
        NodeType::Text(text) => {
            let _ = obj.insert("type".to_string(), json!("text"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
    }

    if !node.children.is_empty() {
        let children: Vec<Value> = node
            .children
            .iter()
            .map(|&child| node_to_json(dom, child))
            .collect();
        let _ = obj.insert("children".to_string(), Value::Array(children));
    }

    Value::Object(obj)
}

fn styles_to_json(dom: &DomTree) -> Value {
    let elements: Vec<Value> = dom
        .iter_all()
        .filter_map(|id| {
            let element = dom.as_element(id)?;
            Some(json!({
                "node": id,
                "tagName": element.tag_name,
                "style": dom.style(id),
            }))
        })
        .collect();
    Value::Array(elements)
}
