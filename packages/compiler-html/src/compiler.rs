use blockpage_layout::{
    Block, Component, HeroData, ImageAsset, ImageGridData, LandingPage, LayoutDocument,
    TwoColumnData,
};
use serde::Serialize;
use serde_json::json;

/// Image grids draw at most this many images
pub const MAX_GRID_IMAGES: usize = 4;

/// Options for HTML rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Public base URL used in structured data
    pub site_url: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            site_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Type string the renderer has no block for
    UnknownType,
    /// Known type whose payload has another block's shape
    DataMismatch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderOutput {
    pub html: String,
    /// Ids of rendered components, in render order
    pub rendered: Vec<String>,
    pub skipped: Vec<SkippedBlock>,
}

struct Context {
    options: RenderOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: RenderOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        let indent = self.options.indent.clone();
        for _ in 0..self.depth {
            self.add(&indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn open(&mut self, tag: &str, class: &str) {
        self.add_line(&format!("<{} class=\"{}\">", tag, class));
        self.indent();
    }

    fn close(&mut self, tag: &str) {
        self.dedent();
        self.add_line(&format!("</{}>", tag));
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Render just the component sections of a document
pub fn render_document(document: &LayoutDocument, options: RenderOptions) -> RenderOutput {
    let mut ctx = Context::new(options);
    let (rendered, skipped) = render_components(document, &mut ctx);

    RenderOutput {
        html: ctx.get_output(),
        rendered,
        skipped,
    }
}

/// Render a complete landing page: head metadata, structured data, and
/// either the components or an empty-state message
pub fn render_page(
    page: &LandingPage,
    document: &LayoutDocument,
    options: RenderOptions,
) -> RenderOutput {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html lang=\"en\">");
    ctx.indent();

    compile_head(page, &mut ctx);

    ctx.add_line("<body>");
    ctx.indent();
    ctx.open("main", "landing-page");

    let (rendered, skipped) = if document.components.is_empty() {
        compile_empty_state(&mut ctx);
        (Vec::new(), Vec::new())
    } else {
        render_components(document, &mut ctx)
    };

    ctx.close("main");
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    RenderOutput {
        html: ctx.get_output(),
        rendered,
        skipped,
    }
}

fn render_components(
    document: &LayoutDocument,
    ctx: &mut Context,
) -> (Vec<String>, Vec<SkippedBlock>) {
    let mut rendered = Vec::new();
    let mut skipped = Vec::new();

    for component in document.ordered_components() {
        match component.block() {
            Some(block) => {
                compile_block(component, block, ctx);
                rendered.push(component.id.clone());
            }
            None => {
                let reason = if component.kind.is_known() {
                    SkipReason::DataMismatch
                } else {
                    SkipReason::UnknownType
                };
                tracing::warn!(
                    "Skipping component {} of type {} ({:?})",
                    component.id,
                    component.kind,
                    reason
                );
                skipped.push(SkippedBlock {
                    id: component.id.clone(),
                    kind: component.kind.to_string(),
                    reason,
                });
            }
        }
    }

    (rendered, skipped)
}

fn compile_head(page: &LandingPage, ctx: &mut Context) {
    let description = page.description();

    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!("<title>{}</title>", escape_html(&page.title)));
    ctx.add_line(&format!(
        "<meta name=\"description\" content=\"{}\">",
        escape_html(&description)
    ));
    ctx.add_line(&format!(
        "<meta property=\"og:title\" content=\"{}\">",
        escape_html(&page.title)
    ));
    ctx.add_line(&format!(
        "<meta property=\"og:description\" content=\"{}\">",
        escape_html(&description)
    ));
    ctx.add_line("<meta property=\"og:type\" content=\"website\">");

    let structured = structured_data(page, &ctx.options.site_url);
    ctx.add_line(&format!(
        "<script type=\"application/ld+json\">{}</script>",
        structured
    ));

    ctx.dedent();
    ctx.add_line("</head>");
}

/// JSON-LD `WebPage` with a two-step breadcrumb
fn structured_data(page: &LandingPage, site_url: &str) -> String {
    let site_url = site_url.trim_end_matches('/');
    let page_url = format!("{}/landing/{}", site_url, page.slug);

    let value = json!({
        "@context": "https://schema.org",
        "@type": "WebPage",
        "name": page.title,
        "description": page.description(),
        "url": page_url,
        "breadcrumb": {
            "@type": "BreadcrumbList",
            "itemListElement": [
                {
                    "@type": "ListItem",
                    "position": 1,
                    "name": "Home",
                    "item": site_url,
                },
                {
                    "@type": "ListItem",
                    "position": 2,
                    "name": page.title,
                    "item": page_url,
                },
            ],
        },
    });

    // Keep `</script>` in titles from closing the tag early
    value.to_string().replace("</", "<\\/")
}

fn compile_empty_state(ctx: &mut Context) {
    ctx.open("div", "empty-state");
    ctx.add_line("<h2>No components configured</h2>");
    ctx.add_line("<p>Use the page builder to add components to this page.</p>");
    ctx.close("div");
}

fn compile_block(component: &Component, block: Block<'_>, ctx: &mut Context) {
    match block {
        Block::Hero(data) => compile_hero(&component.id, data, ctx),
        Block::TwoColumn(data) => compile_two_column(&component.id, data, ctx),
        Block::ImageGrid(data) => compile_image_grid(&component.id, data, ctx),
    }
}

fn section_open(id: &str, class: &str, ctx: &mut Context) {
    ctx.add_line(&format!(
        "<section id=\"{}\" class=\"{}\">",
        escape_html(id),
        class
    ));
    ctx.indent();
}

fn compile_hero(id: &str, data: &HeroData, ctx: &mut Context) {
    section_open(id, "hero", ctx);

    ctx.open("div", "hero-background");
    compile_image(&data.background_image, "hero-image", ctx);
    ctx.add_line("<div class=\"hero-overlay\"></div>");
    ctx.close("div");

    ctx.open("div", "hero-container");
    ctx.open("div", "hero-content");
    ctx.add_line(&format!(
        "<h1 class=\"hero-heading\">{}</h1>",
        escape_html(&data.heading)
    ));
    ctx.add_line(&format!(
        "<p class=\"hero-subtitle\">{}</p>",
        escape_html(&data.subtitle)
    ));
    compile_link(&data.cta_url, &data.cta_text, "hero-button", ctx);
    ctx.close("div");
    ctx.close("div");

    ctx.close("section");
}

fn compile_two_column(id: &str, data: &TwoColumnData, ctx: &mut Context) {
    section_open(id, "two-column", ctx);
    ctx.open("div", "container");
    ctx.open("div", "content");

    ctx.open("div", "left-column");
    ctx.add_line(&format!(
        "<h2 class=\"heading\">{}</h2>",
        escape_html(&data.left_heading)
    ));
    ctx.add_line(&format!(
        "<p class=\"subtitle\">{}</p>",
        escape_html(&data.left_subtitle)
    ));
    compile_link(&data.left_cta_url, &data.left_cta_text, "button", ctx);
    ctx.close("div");

    ctx.open("div", "right-column");
    ctx.open("div", "image-container");
    compile_image(&data.right_image, "image", ctx);
    ctx.close("div");
    ctx.close("div");

    ctx.close("div");
    ctx.close("div");
    ctx.close("section");
}

fn compile_image_grid(id: &str, data: &ImageGridData, ctx: &mut Context) {
    section_open(id, "image-grid", ctx);
    ctx.open("div", "container");
    ctx.open("div", "grid");

    for image in data.images.iter().take(MAX_GRID_IMAGES) {
        ctx.add_line(&format!(
            "<div class=\"grid-item\" data-asset=\"{}\">",
            escape_html(image.id())
        ));
        ctx.indent();
        compile_image(image, "image", ctx);
        ctx.close("div");
    }

    ctx.close("div");
    ctx.close("div");
    ctx.close("section");
}

fn compile_image(image: &ImageAsset, class: &str, ctx: &mut Context) {
    ctx.add_line(&format!(
        "<img class=\"{}\" src=\"{}\" alt=\"{}\" width=\"{}\" height=\"{}\" />",
        class,
        escape_html(&image.url),
        escape_html(&image.title),
        image.width,
        image.height
    ));
}

fn compile_link(href: &str, text: &str, class: &str, ctx: &mut Context) {
    ctx.add_line(&format!(
        "<a class=\"{}\" href=\"{}\">{}</a>",
        class,
        escape_html(href),
        escape_html(text)
    ));
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
