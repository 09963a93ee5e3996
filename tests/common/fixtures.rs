//! Reusable project content

pub const PROJECT_CONFIG: &str = r#"[paths]
source = "./src/sass/**/*.scss"
dest = "./dist/css"

[prefix]
browsers = ["safari 6"]
"#;

pub const MAIN_SCSS: &str = r#"@use "variables" as v;

.button {
  color: v.$primary;
  display: flex;

  &:hover {
    color: darken(v.$primary, 10%);
  }
}
"#;

pub const VARIABLES_PARTIAL: &str = r#"$primary: #3366ff;
"#;

pub const NESTED_SCSS: &str = r#".card {
  .title {
    margin: 0 auto;
  }
}
"#;

/// Missing closing brace
pub const BROKEN_SCSS: &str = r#".broken {
  color: red;
"#;
