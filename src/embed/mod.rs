//! Embedded static resources for the development server.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Dev server resources (livereload.js, directory.html)
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{LIVERELOAD_JS, LivereloadVars};
//!
//! let js = LIVERELOAD_JS.render(&LivereloadVars { ws_port: 35729 });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// URL the live reload client script is served from.
    pub const LIVERELOAD_JS_PATH: &str = "/__livereload.js";

    /// Variables for livereload.js template.
    pub struct LivereloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for LivereloadVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__WS_PORT__", &self.ws_port.to_string())
        }
    }

    /// Live reload client: connects to the WebSocket port and reloads on
    /// `reload` messages.
    pub const LIVERELOAD_JS: Template<LivereloadVars> =
        Template::new(include_str!("serve/livereload.js"));

    /// `<script>` tag injected into served HTML.
    pub fn livereload_tag() -> String {
        format!(r#"<script src="{LIVERELOAD_JS_PATH}"></script>"#)
    }

    /// Variables for directory.html template.
    pub struct ListingVars {
        /// Escaped request path shown in the title and heading.
        pub path: String,
        pub parent_link: String,
        pub entries: String,
    }

    impl TemplateVars for ListingVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__PATH__", &self.path)
                .replace("__PARENT_LINK__", &self.parent_link)
                .replace("__ENTRIES__", &self.entries)
        }
    }

    /// Directory listing page.
    pub const DIRECTORY_HTML: Template<ListingVars> =
        Template::new(include_str!("serve/directory.html"));

}
