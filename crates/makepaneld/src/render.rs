//! HTML fragments rendered with minijinja
//!
//! Templates are embedded at compile time. HTML auto-escaping follows the
//! `.html` template names.

use minijinja::{Environment, Value, context};
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static ENGINE: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.add_template("base.html", include_str!("templates/base.html"))
        .expect("base template must compile");
    env.add_template("editor.html", include_str!("templates/editor.html"))
        .expect("editor template must compile");
    env.add_template("files.html", include_str!("templates/files.html"))
        .expect("files template must compile");
    env.add_template("commands.html", include_str!("templates/commands.html"))
        .expect("commands template must compile");
    env
});

fn render(name: &str, ctx: Value) -> Result<String, minijinja::Error> {
    ENGINE.get_template(name)?.render(ctx)
}

pub fn base_page() -> Result<String, minijinja::Error> {
    render(
        "base.html",
        context! { version => crate::version::CURRENT_VERSION },
    )
}

pub fn editor(filename: &str, content: &str) -> Result<String, minijinja::Error> {
    render("editor.html", context! { filename, content })
}

pub fn file_list(files: &[String]) -> Result<String, minijinja::Error> {
    render("files.html", context! { files })
}

pub fn command_list(commands: &[String], running: Option<&str>) -> Result<String, minijinja::Error> {
    render("commands.html", context! { commands, running })
}
