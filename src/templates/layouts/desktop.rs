use maud::{html, Markup, PreEscaped, DOCTYPE};

// Ships inline so pages render without a static asset route.
const MAIN_CSS: &str = r#"
body {
  font-family: system-ui, sans-serif;
  margin: 0;
  color: #1f2937;
  background: #f9fafb;
}
header.site {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 0.75rem 1.5rem;
  background: white;
  box-shadow: 0 1px 2px rgba(0,0,0,0.08);
}
header.site h3 { margin: 0; }
header.site nav ul {
  display: flex;
  gap: 1.25rem;
  list-style: none;
  margin: 0;
  padding: 0;
}
header.site nav a { color: #1f2937; text-decoration: none; font-weight: 500; }
header.site nav a:hover { color: #047857; }
main.container {
  max-width: 1060px;
  margin: 1.5rem auto;
  padding: 0 1rem;
}
.card {
  background: white;
  border: 1px solid #e5e7eb;
  border-radius: 8px;
  padding: 1rem 1.25rem;
  margin-bottom: 1.5rem;
}
.btn {
  display: inline-block;
  padding: 8px 16px;
  background: #047857;
  color: white;
  border: none;
  border-radius: 4px;
  cursor: pointer;
  font-size: 0.95em;
  text-decoration: none;
}
.btn:hover { background: #065f46; }
.btn.secondary { background: #6b7280; }
.btn.danger { background: #dc2626; }
input[type=text], input[type=email], input[type=password], input[type=number],
select, textarea {
  padding: 8px;
  border: 1px solid #ccc;
  border-radius: 4px;
  font-size: 0.95em;
  font-family: inherit;
}
label { font-weight: 500; font-size: 0.9em; }
.alert {
  padding: 10px 14px;
  border-radius: 6px;
  margin-bottom: 1rem;
}
.alert.success { background: #d1fae5; color: #065f46; }
.alert.error { background: #fee2e2; color: #991b1b; }
.badge {
  padding: 2px 8px;
  border-radius: 9999px;
  color: white;
  font-size: 0.82em;
  font-weight: 500;
  white-space: nowrap;
}
"#;

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · AmbiTrack" }
                style { (PreEscaped(MAIN_CSS)) }
            }
            body {
                header class="site" {
                    svg
                        xmlns="http://www.w3.org/2000/svg"
                        width="24"
                        height="24"
                        viewBox="0 0 24 24"
                        fill="none"
                        stroke="#047857"
                        stroke-width="2"
                        stroke-linecap="round"
                        stroke-linejoin="round"
                    {
                        path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                        path d="M12 3l8 4.5v9l-8 4.5l-8 -4.5v-9z" {}
                        path d="M12 12l8 -4.5" {}
                        path d="M12 12v9" {}
                        path d="M12 12l-8 -4.5" {}
                    }
                    h3 { "AmbiTrack" }
                    nav {
                        ul {
                            li { a href="/" { "Dashboard" } }
                            li { a href="/complaints" { "Complaints" } }
                            li { a href="/categories" { "Categories" } }
                            li { a href="/users" { "Users" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
