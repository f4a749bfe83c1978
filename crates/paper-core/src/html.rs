//! HTML building blocks shared by documents and folders
//!
//! Every node of the report is a `<details>` disclosure widget. The page
//! header defines the styles for those widgets and the two buttons that
//! open or close all of them at once.

/// Element id carried by folder blocks
pub const FOLDER_ID: &str = "Folder";

/// Page header prepended once to a complete report.
pub const REPORT_HEADER: &str = r#"
<style>
  #Folder {
    padding: 8px;
    background-color: #e0e0e0;
    border: none;
    box-shadow: 1px 1px 2px #bbbbbb;
    cursor: pointer;
  }
  details > summary {
    padding: 4px;
    background-color: #eeeeee;
    border: none;
    box-shadow: 1px 1px 2px #bbbbbb;
    cursor: pointer;
  }

  details > p {
    background-color: #eeeeee;
    padding: 4px;
    margin: 0;
    box-shadow: 1px 1px 2px #bbbbbb;
  }
</style>
<script>
  function openAll() {
    var x = document.getElementsByTagName("details");
    var i;
    for (i = 0; i < x.length; i++) {
      x[i].open = true
    }
  }
  function closeAll() {
    var x = document.getElementsByTagName("details");
    var i;
    for (i = 0; i < x.length; i++) {
      x[i].open = false
    }
  }
</script>
<button onclick="openAll()">Expand All</button>
<button onclick="closeAll()">Close All</button>
"#;

/// Escape text for use in element content and attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Wrap `body` in a collapsible block.
///
/// `summary` is inserted verbatim, callers escape it.
pub fn collapsible(id: Option<&str>, summary: &str, body: &str) -> String {
    let open_tag = match id {
        Some(id) => format!("<details id=\"{}\">", id),
        None => "<details>".to_string(),
    };
    format!(
        "{}\n<summary>{}</summary>\n<p>\n{}\n</p>\n</details>",
        open_tag, summary, body
    )
}
