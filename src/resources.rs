use console::style;

pub struct Link {
    pub title: &'static str,
    pub url: &'static str,
}

pub struct Section {
    pub heading: &'static str,
    pub links: &'static [Link],
}

pub const RECOMMENDED_READING: &[Section] = &[
    Section {
        heading: "Sandbox vs Token Generation",
        links: &[
            Link {
                title: "Performance benchmarks",
                url: "https://www.anthropic.com/news/claude-3-5-sonnet",
            },
            Link {
                title: "Token limits & latency",
                url: "https://platform.openai.com/docs/guides/rate-limits",
            },
        ],
    },
    Section {
        heading: "Browser Infrastructure",
        links: &[
            Link {
                title: "Browserbase documentation",
                url: "https://docs.browserbase.com/",
            },
            Link {
                title: "Playwright",
                url: "https://playwright.dev/docs/intro",
            },
            Link {
                title: "Vercel Agent Browser",
                url: "https://github.com/vercel-labs/agent-browser",
            },
        ],
    },
    Section {
        heading: "Benchmarking Tools",
        links: &[Link {
            title: "Terminal recording",
            url: "https://github.com/charmbracelet/vhs",
        }],
    },
];

pub fn print_resources() {
    println!("{}", style("\nRecommended Reading:").bold().blue());
    for section in RECOMMENDED_READING {
        println!("{}", style(format!("\n{}:", section.heading)).yellow());
        for link in section.links {
            println!("  - {} ({})", style(link.url).underlined(), link.title);
        }
    }
}
