use crate::models::{DevicesResponse, SharePoint};

pub fn render_dashboard(devices: &DevicesResponse) -> String {
    let scope = match devices.brand_id.as_deref() {
        Some(brand) => format!("Scanners of brand {}", escape_html(brand)),
        None => "All users".to_string(),
    };

    DASHBOARD_HTML
        .replace("{{SCOPE}}", &scope)
        .replace("{{OS_TOTAL}}", &devices.total_users.to_string())
        .replace("{{TYPE_TOTAL}}", &devices.device_type_total_users.to_string())
        .replace("{{OS_ROWS}}", &render_rows(&devices.device_shares))
        .replace("{{TYPE_ROWS}}", &render_rows(&devices.device_type_shares))
}

fn render_rows(shares: &[SharePoint]) -> String {
    shares
        .iter()
        .map(|share| {
            format!(
                r#"<li><span class="name">{}</span><span class="bar"><span style="width: {:.1}%"></span></span><span class="value">{} ({:.1}%)</span></li>"#,
                escape_html(&share.name),
                share.percent,
                share.value,
                share.percent
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Campaign Devices</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
      gap: 20px;
    }

    ul {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    li {
      display: grid;
      grid-template-columns: 90px 1fr 90px;
      align-items: center;
      gap: 10px;
    }

    .bar {
      height: 12px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.1);
      overflow: hidden;
    }

    .bar span {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .value {
      text-align: right;
      color: var(--accent-2);
      font-variant-numeric: tabular-nums;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Device breakdown</h1>
      <p class="subtitle">{{SCOPE}}</p>
    </header>
    <section class="charts">
      <div>
        <h2>Operating system</h2>
        <p class="subtitle">{{OS_TOTAL}} users</p>
        <ul>
        {{OS_ROWS}}
        </ul>
      </div>
      <div>
        <h2>Device type</h2>
        <p class="subtitle">{{TYPE_TOTAL}} users</p>
        <ul>
        {{TYPE_ROWS}}
        </ul>
      </div>
    </section>
  </main>
</body>
</html>
"#;
