//! Render option schema
//!
//! [`RenderOptions`] is the typed record behind the `render` tool. Types and
//! closed enum sets are enforced by the record itself; inclusive numeric
//! bounds live in [`NUMERIC_BOUNDS`]. Validation runs every option through
//! both and reports every violation at once.

use crate::error::{ValidationError, Violation};
use schemars::JsonSchema;
use schemars::generate::SchemaSettings;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use url::Url;

/// A JSON object as received from a tool call.
pub type JsonObject = serde_json::Map<String, Value>;

/// File name placeholder used when rendering raw HTML instead of a URL.
pub const HTML_SOURCE_PLACEHOLDER: &str = "html-render";

/// Output format of the primary render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
    Avif,
    Svg,
    Pdf,
    Html,
    Mp4,
    Webm,
    Md,
    Json,
    Mhtml,
}

impl RenderFormat {
    pub const ALL: [RenderFormat; 12] = [
        RenderFormat::Png,
        RenderFormat::Jpeg,
        RenderFormat::Webp,
        RenderFormat::Avif,
        RenderFormat::Svg,
        RenderFormat::Pdf,
        RenderFormat::Html,
        RenderFormat::Mp4,
        RenderFormat::Webm,
        RenderFormat::Md,
        RenderFormat::Json,
        RenderFormat::Mhtml,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderFormat::Png => "png",
            RenderFormat::Jpeg => "jpeg",
            RenderFormat::Webp => "webp",
            RenderFormat::Avif => "avif",
            RenderFormat::Svg => "svg",
            RenderFormat::Pdf => "pdf",
            RenderFormat::Html => "html",
            RenderFormat::Mp4 => "mp4",
            RenderFormat::Webm => "webm",
            RenderFormat::Md => "md",
            RenderFormat::Json => "json",
            RenderFormat::Mhtml => "mhtml",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    Cover,
    Contain,
    Fill,
    Inside,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PdfPageSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    Legal,
    Letter,
    Ledger,
    Tabloid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PdfOrientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Screen,
    Print,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EngineVersion {
    Latest,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    Domloaded,
    Mostrequestsfinished,
    Requestsfinished,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FullPageMode {
    Scroll,
    Native,
}

/// A single string or a list of strings, kept in the shape it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        };
        items.iter().map(String::as_str)
    }
}

/// Where to scroll before capturing: an element selector or a pixel offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ScrollTarget {
    Selector(String),
    Offset(f64),
}

/// Inclusive numeric bound of one option. `max` is open when `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBound {
    pub option: &'static str,
    pub min: f64,
    pub max: Option<f64>,
}

impl NumericBound {
    const fn between(option: &'static str, min: f64, max: f64) -> Self {
        Self {
            option,
            min,
            max: Some(max),
        }
    }

    const fn at_least(option: &'static str, min: f64) -> Self {
        Self {
            option,
            min,
            max: None,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.is_none_or(|max| value <= max)
    }

    fn describe(&self, value: f64) -> String {
        match self.max {
            Some(max) => format!("must be between {} and {}, got {}", self.min, max, value),
            None => format!("must be at least {}, got {}", self.min, value),
        }
    }
}

pub const NUMERIC_BOUNDS: &[NumericBound] = &[
    NumericBound::between("width", 100.0, 4000.0),
    NumericBound::between("height", 100.0, 4000.0),
    NumericBound::between("quality", 1.0, 100.0),
    NumericBound::between("max_height", 100.0, 20000.0),
    NumericBound::between("pdf_page_width", 100.0, 4000.0),
    NumericBound::between("pdf_page_height", 100.0, 4000.0),
    NumericBound::between("pdf_scale", 0.1, 2.0),
    NumericBound::between("ttl", 60.0, 2_592_000.0),
    NumericBound::between("delay", 0.0, 30000.0),
    NumericBound::between("timeout", 5000.0, 100_000.0),
    NumericBound::between("wait_timeout", 1000.0, 30000.0),
    NumericBound::between("max_section_height", 1000.0, 10000.0),
    NumericBound::between("scroll_increment", 100.0, 2000.0),
    NumericBound::between("scroll_delay", 100.0, 5000.0),
    NumericBound::between("latitude", -90.0, 90.0),
    NumericBound::between("longitude", -180.0, 180.0),
    NumericBound::at_least("accuracy", 0.0),
];

fn bound_for(option: &str) -> Option<&'static NumericBound> {
    NUMERIC_BOUNDS.iter().find(|b| b.option == option)
}

/// Declares the option record: every field is optional, omitted from the
/// JSON encoding when absent, and listed in `RenderOptions::FIELDS`.
macro_rules! render_options {
    ($( $(#[$meta:meta])* $field:ident: $ty:ty, )*) => {
        /// Options accepted by the `render` tool.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
        #[serde(deny_unknown_fields)]
        pub struct RenderOptions {
            $(
                $(#[$meta])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl RenderOptions {
            /// Names of every accepted option, in declaration order.
            pub const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];
        }
    };
}

render_options! {
    /// Flip this to true to save all downloadable render links to local disk.
    store_renders: bool,

    // Basic
    /// The URL or domain of the website you want to screenshot.
    url: String,
    /// The HTML you want to render if not a URL.
    html: String,
    /// The output format of the resulting render.
    format: RenderFormat,
    /// The viewport width of the browser, in pixels.
    width: Number,
    /// The viewport height of the browser, in pixels.
    height: Number,
    /// Specify whether to capture the full scrollable area of the website.
    full_page: bool,
    /// Take a screenshot of the element that matches this selector.
    selector: String,
    /// Clip the screenshot to the bounding box specified by x,y,width,height.
    clip: String,
    /// Enable GPU acceleration to render 3D scenes and heavy WebGL content.
    gpu: bool,

    // Blocking
    /// Blocks requests from popular advertising networks from loading.
    block_ads: bool,
    /// Automatically hides cookie banners from most websites.
    hide_cookie_banners: bool,
    /// Attempts to click on the 'Accept' button to accept cookies.
    click_accept: bool,
    /// Attempts to press the Escape (ESC) key before capturing the page.
    press_escape: bool,
    /// Block requests from specific domains from loading. Wildcards match subdomains.
    block_urls: Vec<String>,
    /// Blocks image requests.
    block_images: bool,
    /// Blocks font requests.
    block_fonts: bool,
    /// Block video and audio requests.
    block_medias: bool,
    /// Prevent stylesheet requests from loading.
    block_styles: bool,
    /// Prevent requests for javascript scripts from loading.
    block_scripts: bool,
    /// Block frames.
    block_frames: bool,
    /// Block fetch requests from the target URL.
    block_fetch: bool,
    /// Block XHR requests from the target URL.
    block_xhr: bool,
    /// Block websocket requests.
    block_sockets: bool,
    /// Comma-delimited string of CSS element selectors that are hidden.
    hide_selector: String,

    // Customize
    /// Execute custom JavaScript in the context of the page.
    js: String,
    /// Inject custom CSS into the page.
    css: String,
    /// Emulate dark mode on websites by setting prefers-color-scheme: dark.
    dark_mode: bool,
    /// Prefer less animations on websites by setting prefers-reduced-motion: reduced.
    reduced_motion: bool,
    /// Shows a timestamp in a header above the rendered screenshot.
    show_timestamp: bool,
    /// Shows a URL in a header above the rendered screenshot.
    show_url: bool,

    // Screenshot
    /// Take a 'retina' or high-definition screenshot, equivalent to a device pixel ratio of 2.0.
    retina: bool,
    /// How the screenshot should be resized or cropped to fit the dimensions.
    img_fit: ImageFit,
    /// How the image should be positioned when using an img_fit of cover or contain.
    img_position: ImagePosition,
    /// Background colour to use when img_fit is contain, or img_pad is used.
    img_bg: String,
    /// Pad the screenshot, giving it a border.
    img_pad: String,
    /// The image quality of the resulting screenshot (JPEG/WebP only).
    quality: Number,
    /// If a website has no background color set, the image will have a transparent background.
    transparent: bool,
    /// Limit the screenshot to a maximum height.
    max_height: Number,

    // PDF
    /// Sets the PDF page size.
    pdf_page_size: PdfPageSize,
    /// Sets the PDF page range to return.
    pdf_page_range: String,
    /// Sets the PDF page width, in pixels.
    pdf_page_width: Number,
    /// Sets the PDF page height, in pixels.
    pdf_page_height: Number,
    /// Sets the margin of the PDF document.
    pdf_margin: String,
    /// Sets a custom top margin on the PDF.
    pdf_margin_top: String,
    /// Sets a custom right margin on the PDF.
    pdf_margin_right: String,
    /// Sets a custom bottom margin on the PDF.
    pdf_margin_bottom: String,
    /// Set a custom left margin on the PDF.
    pdf_margin_left: String,
    /// Automatically remove white space from PDF.
    pdf_auto_crop: bool,
    /// Sets the scale factor of the website content in the PDF.
    pdf_scale: f64,
    /// Sets the orientation of the PDF.
    pdf_orientation: PdfOrientation,
    /// Sets whether to print background images in the PDF.
    pdf_background: bool,
    /// Prevents ligatures from being used.
    disable_ligatures: bool,
    /// By default, when generating a PDF, the print CSS media query is used.
    media: MediaType,
    /// Whether to show the default pdf header on each page of the pdf.
    pdf_show_header: bool,
    /// Change the default pdf header that is shown on each page of the pdf.
    pdf_header: String,
    /// Whether to show the default pdf footer on each page of the pdf.
    pdf_show_footer: bool,
    /// Change the default pdf footer that is shown on each page of the pdf.
    pdf_footer: String,
    /// Make the pdf into a readable document by removing unnecessary elements.
    readable: bool,

    // Cache
    /// Generate a fresh render, instead of getting a cached version.
    force: bool,
    /// Pass a unique string such as a UUID, hash or timestamp.
    unique: String,
    /// The duration to keep a render in the cache, in seconds.
    ttl: Number,

    // Request
    /// Pass in a proxy server address to make screenshot requests via that server.
    proxy: String,
    /// Set a header on the request when loading the URL.
    header: OneOrMany,
    /// Sets a cookie on the request when loading the URL.
    cookie: OneOrMany,
    /// Sets the User-Agent string for the request: `random`, `mobile`, `desktop` or a custom string.
    user_agent: String,
    /// Sets the navigator.platform that the browser will report for the request.
    platform: String,
    /// Sets an Accept-Language header on requests to the target URL.
    accept_lang: String,
    /// Sets an Authorization header on requests to the target URL.
    authorization: String,
    /// Emulate the timezone to use when rendering pages.
    tz: String,
    /// Sets the version of the rendering engine to use. Latest provides the latest bug fixes and features.
    engine_version: EngineVersion,
    /// Creates a hash of the rendered file, timestamp and options providing proof.
    certify: bool,

    // Wait
    /// The amount of time to wait before capturing a render, in milliseconds.
    delay: Number,
    /// The amount of time to wait for the requested URL to load, in milliseconds.
    timeout: Number,
    /// Waits until the specified DOM event has fired before capturing a render.
    wait_until: WaitUntil,
    /// Waits for the element specified by this selector to be present in the DOM.
    wait_for: String,
    /// Waits for the element specified by this selector to be absent from the DOM.
    wait_to_leave: String,
    /// The amount of time to wait for the wait_for element to appear.
    wait_timeout: Number,

    // Fail
    /// Fails the request if the elements specified by selector or wait_for options are not found.
    fail_if_selector_missing: bool,
    /// Fails the request if the element specified by wait_to_leave option is found.
    fail_if_selector_present: bool,
    /// Fail if the requested URL returns a status code between 400 and 499.
    fail_on_4xx: bool,
    /// Fail if the requested URL returns a status code between 500 and 599.
    fail_on_5xx: bool,

    // Page
    /// Scroll, to either an element or to a pixel offset from the top.
    scroll_to: ScrollTarget,
    /// Specifies an element selector to click before generating a screenshot or PDF.
    click: OneOrMany,
    /// Specifies an element selector to click all matching elements.
    click_all: OneOrMany,
    /// Specifies an element selector to hover over before generating a screenshot or PDF.
    hover: String,
    /// Specify a hex code or CSS color string to use as the background color.
    bg_color: String,

    // Full page
    /// Whether to use scroll and stitch algorithm or native full page screenshot.
    full_page_mode: FullPageMode,
    /// When full_page=true, specify whether to capture the full width of the website.
    full_width: bool,
    /// Override the default behavior to prevent infinite scrolling.
    allow_infinite: bool,
    /// Speed up renders by skipping an initial scroll through the page.
    skip_scroll: bool,
    /// Prevent backgrounds from getting stretched when making a full page screenshot.
    detect_full_height: bool,
    /// The maximum height of each image section when taking a full_page screenshot.
    max_section_height: Number,
    /// Sets how many pixels to scroll when scrolling the page.
    scroll_increment: Number,
    /// The time to wait between taking the screenshots of each individual section.
    scroll_delay: Number,

    // Highlighting
    /// Specify a string to highlight on the page before capturing a screenshot or PDF.
    highlight: String,
    /// Specify the text color of the highlighted word.
    highlightfg: String,
    /// Specify the background color of the highlighted word.
    highlightbg: String,

    // Geolocation
    /// Sets the latitude used to emulate the Geolocation API.
    latitude: f64,
    /// Sets the longitude used to emulate the Geolocation API.
    longitude: f64,
    /// Sets the accuracy of the Geolocation API in metres.
    accuracy: f64,

    // Storage
    /// Save the render directly to the S3 (or S3-Compatible) bucket configured on your account.
    use_s3: bool,
    /// Sets the S3 path, including subdirectories and the filename.
    s3_path: String,
    /// By default the file extension is added to the s3_path; set to skip it.
    no_suffix: bool,
    /// Overrides the configured bucket to use when saving the render.
    s3_bucket: String,
    /// Change the endpoint URL to use an S3 compatible storage provider.
    s3_endpoint: String,
    /// Override the configured S3 region when saving the render.
    s3_region: String,
    /// If your custom bucket is fronted by a CDN, you can set the host name here.
    cdn_host: String,
    /// Sets the s3 storage class.
    s3_storageclass: String,
    /// Alongside the main render, also save it as HTML and return a storage URL.
    save_html: bool,
    /// Alongside the main render, also save its metadata and return a storage URL.
    save_metadata: bool,
    /// Alongside the main render, also save it as Markdown and return a storage URL.
    save_markdown: bool,
    /// Alongside the main render, also save it as MHTML and return a storage URL.
    save_mhtml: bool,
    /// Alongside the main render, also save the cookies it used and return a storage URL.
    save_cookies: bool,

    // Point of view
    /// Use a Point of View (hidden, trusted, stealth, premium, geo) to emulate loading the
    /// website from a particular, less block-prone location. Not compatible with
    /// authorization or cookies.
    pov: String,
    /// Country code for the Point of View, such as us, gb or ca.
    pov_country: String,
}

impl RenderOptions {
    /// Options for rendering `url` with everything else left to the service.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Validate a tool argument value.
    ///
    /// Every option is checked independently, so the error lists every
    /// offending field rather than the first one.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(arguments) => Self::from_arguments(arguments),
            other => Err(ValidationError::single(
                "arguments",
                format!("expected an object of render options, got {}", json_type(&other)),
            )),
        }
    }

    /// Validate an argument map.
    pub fn from_arguments(arguments: JsonObject) -> Result<Self, ValidationError> {
        let mut violations: Vec<Violation> = arguments
            .iter()
            .filter_map(|(name, value)| {
                check_option(name, value).map(|problem| Violation::new(name, problem))
            })
            .collect();

        let has_source = ["url", "html"]
            .iter()
            .any(|name| arguments.get(*name).is_some_and(|v| !v.is_null()));
        if !has_source {
            violations.push(Violation::new(
                "url",
                "either `url` or `html` must be provided",
            ));
        }

        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }

        serde_json::from_value(Value::Object(arguments))
            .map_err(|e| ValidationError::single("arguments", e.to_string()))
    }

    /// JSON encoding of the record; absent options are omitted.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(JsonObject::new()))
    }

    /// Body for the remote render endpoint. Local-only flags are stripped.
    pub fn request_body(&self) -> Value {
        let mut body = self.to_value();
        if let Value::Object(ref mut map) = body {
            map.remove("store_renders");
        }
        body
    }

    /// Whether rendered artifacts should be written to local disk.
    pub fn stores_renders(&self) -> bool {
        self.store_renders.unwrap_or(false)
    }

    /// The requested output format, `png` when unset.
    pub fn output_format(&self) -> RenderFormat {
        self.format.unwrap_or_default()
    }

    /// Hostname of the target URL, `None` when rendering raw HTML.
    pub fn source_host(&self) -> Option<String> {
        let url = Url::parse(self.url.as_deref()?).ok()?;
        url.host_str().map(str::to_string)
    }

    /// Short label for logs: the target URL or the HTML placeholder.
    pub fn source_label(&self) -> &str {
        self.url.as_deref().unwrap_or(HTML_SOURCE_PLACEHOLDER)
    }

    /// JSON Schema for the tool arguments, carrying the numeric bounds the
    /// validator enforces.
    pub fn input_schema() -> JsonObject {
        let generator = SchemaSettings::draft2020_12()
            .with(|s| s.inline_subschemas = true)
            .into_generator();
        let schema = generator.into_root_schema_for::<RenderOptions>();

        let mut schema = match serde_json::to_value(schema) {
            Ok(Value::Object(map)) => map,
            _ => JsonObject::new(),
        };
        schema.remove("$schema");
        schema.remove("title");
        schema.insert("type".to_string(), Value::from("object"));

        if let Some(Value::Object(properties)) = schema.get_mut("properties") {
            for bound in NUMERIC_BOUNDS {
                if let Some(Value::Object(property)) = properties.get_mut(bound.option) {
                    property.insert("minimum".to_string(), Value::from(bound.min));
                    match bound.max {
                        Some(max) => {
                            property.insert("maximum".to_string(), Value::from(max));
                        }
                        None => {
                            property.remove("maximum");
                        }
                    }
                }
            }
        }

        schema
    }
}

/// Check one option in isolation; `None` means it is acceptable.
fn check_option(name: &str, value: &Value) -> Option<String> {
    if !RenderOptions::FIELDS.contains(&name) {
        return Some("unknown option".to_string());
    }

    if let (Some(bound), Some(number)) = (bound_for(name), value.as_f64()) {
        if !bound.contains(number) {
            return Some(bound.describe(number));
        }
    }

    let mut single = JsonObject::new();
    single.insert(name.to_string(), value.clone());
    if let Err(e) = serde_json::from_value::<RenderOptions>(Value::Object(single)) {
        return Some(e.to_string());
    }

    match (name, value.as_str()) {
        ("url", Some(raw)) => check_url(raw).err(),
        _ => None,
    }
}

fn check_url(raw: &str) -> Result<(), String> {
    let parsed = Url::parse(raw).map_err(|e| format!("`{raw}` is not a valid absolute URL: {e}"))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(format!("`{raw}` is not an absolute URL with a host"));
    }
    Ok(())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(value: Value) -> Result<RenderOptions, ValidationError> {
        RenderOptions::from_value(value)
    }

    #[test]
    fn test_minimal_url_options() {
        let options = validate(json!({"url": "https://example.com"})).unwrap();
        assert_eq!(options.url.as_deref(), Some("https://example.com"));
        assert_eq!(options.output_format(), RenderFormat::Png);
        assert!(!options.stores_renders());
        assert_eq!(options.source_host().as_deref(), Some("example.com"));
    }

    #[test]
    fn test_html_source_without_url() {
        let options = validate(json!({"html": "<h1>hi</h1>", "format": "pdf"})).unwrap();
        assert_eq!(options.source_host(), None);
        assert_eq!(options.source_label(), HTML_SOURCE_PLACEHOLDER);
        assert_eq!(options.output_format(), RenderFormat::Pdf);
    }

    #[test]
    fn test_missing_source_rejected() {
        let err = validate(json!({"format": "png"})).unwrap_err();
        assert!(err.mentions("url"));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = validate(json!({"url": "not-a-url"})).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.mentions("url"));

        let err = validate(json!({"url": "mailto:someone@example.com"})).unwrap_err();
        assert!(err.mentions("url"));
    }

    #[test]
    fn test_non_object_arguments_rejected() {
        let err = validate(json!(["https://example.com"])).unwrap_err();
        assert!(err.mentions("arguments"));
    }

    #[test]
    fn test_numeric_bounds_are_inclusive() {
        for bound in NUMERIC_BOUNDS {
            let at_min = json!({"url": "https://example.com", bound.option: bound.min});
            let at_min = if bound.min.fract() == 0.0 {
                json!({"url": "https://example.com", bound.option: bound.min as i64})
            } else {
                at_min
            };
            assert!(validate(at_min).is_ok(), "{} rejected its minimum", bound.option);

            let below = json!({"url": "https://example.com", bound.option: bound.min - 1.0});
            let err = validate(below).unwrap_err();
            assert!(err.mentions(bound.option), "{} accepted a value below min", bound.option);

            if let Some(max) = bound.max {
                let at_max = if max.fract() == 0.0 {
                    json!({"url": "https://example.com", bound.option: max as i64})
                } else {
                    json!({"url": "https://example.com", bound.option: max})
                };
                assert!(validate(at_max).is_ok(), "{} rejected its maximum", bound.option);

                let above = json!({"url": "https://example.com", bound.option: max + 1.0});
                let err = validate(above).unwrap_err();
                assert!(err.mentions(bound.option), "{} accepted a value above max", bound.option);
            }
        }
    }

    #[test]
    fn test_every_bound_names_a_field() {
        for bound in NUMERIC_BOUNDS {
            assert!(
                RenderOptions::FIELDS.contains(&bound.option),
                "{} is not an option",
                bound.option
            );
        }
    }

    #[test]
    fn test_fractional_values_within_bounds_accepted() {
        let options = validate(json!({
            "url": "https://example.com",
            "width": 1280.5,
            "delay": 1500.0,
            "quality": 80,
        }))
        .unwrap();

        let body = options.request_body();
        assert_eq!(body["width"], json!(1280.5));
        assert_eq!(body["delay"], json!(1500.0));
        assert!(body["quality"].is_u64());

        let err = validate(json!({"url": "https://example.com", "width": "1280"})).unwrap_err();
        assert!(err.mentions("width"));
    }

    #[test]
    fn test_every_format_accepted() {
        for format in RenderFormat::ALL {
            let options =
                validate(json!({"url": "https://example.com", "format": format.as_str()})).unwrap();
            assert_eq!(options.output_format(), format);
        }
    }

    #[test]
    fn test_enum_values_outside_set_rejected() {
        let cases = [
            ("format", "gif"),
            ("img_fit", "stretch"),
            ("img_position", "middle"),
            ("pdf_page_size", "B5"),
            ("pdf_orientation", "sideways"),
            ("media", "tv"),
            ("engine_version", "beta"),
            ("wait_until", "idle"),
            ("full_page_mode", "stitch"),
        ];
        for (option, value) in cases {
            let err = validate(json!({"url": "https://example.com", option: value})).unwrap_err();
            assert!(err.mentions(option), "{option}={value} was accepted");
        }
    }

    #[test]
    fn test_enum_members_accepted() {
        let options = validate(json!({
            "url": "https://example.com",
            "img_fit": "contain",
            "img_position": "northwest",
            "pdf_page_size": "Tabloid",
            "pdf_orientation": "landscape",
            "media": "print",
            "engine_version": "stable",
            "wait_until": "mostrequestsfinished",
            "full_page_mode": "native",
        }))
        .unwrap();
        assert_eq!(options.pdf_page_size, Some(PdfPageSize::Tabloid));
        assert_eq!(options.wait_until, Some(WaitUntil::Mostrequestsfinished));
    }

    #[test]
    fn test_every_violation_reported() {
        let err = validate(json!({
            "url": "not-a-url",
            "width": 50,
            "format": "gif",
            "full_page": "yes",
            "colour": "red",
        }))
        .unwrap_err();

        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["colour", "format", "full_page", "url", "width"]);
    }

    #[test]
    fn test_union_fields_accept_both_shapes() {
        let options = validate(json!({
            "url": "https://example.com",
            "header": "X-Test: 1",
            "cookie": ["a=1", "b=2"],
            "click": "#accept",
            "click_all": [".expand", ".more"],
            "scroll_to": 400,
        }))
        .unwrap();

        assert_eq!(options.header, Some(OneOrMany::One("X-Test: 1".to_string())));
        assert_eq!(options.cookie.as_ref().unwrap().iter().collect::<Vec<_>>(), vec!["a=1", "b=2"]);
        assert_eq!(options.scroll_to, Some(ScrollTarget::Offset(400.0)));

        let body = options.request_body();
        assert_eq!(body["header"], json!("X-Test: 1"));
        assert_eq!(body["cookie"], json!(["a=1", "b=2"]));
    }

    #[test]
    fn test_union_fields_reject_other_shapes() {
        let err = validate(json!({"url": "https://example.com", "cookie": [1, 2]})).unwrap_err();
        assert!(err.mentions("cookie"));
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let options = validate(json!({
            "url": "https://example.com",
            "format": "jpeg",
            "width": 1280,
            "pdf_scale": 1.5,
            "header": ["A: 1", "B: 2"],
            "scroll_to": "#footer",
            "latitude": -33.9,
            "store_renders": true,
        }))
        .unwrap();

        let reparsed = RenderOptions::from_value(options.to_value()).unwrap();
        assert_eq!(reparsed, options);
    }

    #[test]
    fn test_request_body_strips_local_flags() {
        let options =
            validate(json!({"url": "https://example.com", "store_renders": true})).unwrap();
        let body = options.request_body();
        assert!(body.get("store_renders").is_none());
        assert_eq!(body["url"], json!("https://example.com"));
        assert_eq!(options.to_value()["store_renders"], json!(true));
    }

    #[test]
    fn test_null_options_are_absent() {
        let options = validate(json!({"url": "https://example.com", "width": null})).unwrap();
        assert_eq!(options.width, None);
    }

    #[test]
    fn test_input_schema_carries_bounds() {
        let schema = RenderOptions::input_schema();
        assert_eq!(schema["type"], json!("object"));

        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), RenderOptions::FIELDS.len());
        assert_eq!(properties["width"]["minimum"], json!(100.0));
        assert_eq!(properties["width"]["maximum"], json!(4000.0));
        assert_eq!(properties["accuracy"]["minimum"], json!(0.0));
        assert!(properties["accuracy"].get("maximum").is_none());
        assert!(
            properties["url"]["description"]
                .as_str()
                .unwrap()
                .contains("website")
        );
    }
}
