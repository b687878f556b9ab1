//! Shared fixtures: edition pages rendered the way the published book lays
//! them out (day sections holding source groups holding article cards).

#![allow(dead_code)]

use awful_news_search::{Dom, HtmlPage, MemoryLocation, NewsSearch, PageNode, SearchConfig};
use scraper::Html;

pub struct ArticleSpec {
    pub title: String,
    pub description: String,
    pub timestamp: Option<String>,
}

pub struct SourceSpec {
    pub name: String,
    pub articles: Vec<ArticleSpec>,
}

pub struct DaySpec {
    pub date: String,
    pub sources: Vec<SourceSpec>,
}

pub fn render_article(article: &ArticleSpec) -> String {
    let time = article
        .timestamp
        .as_ref()
        .map(|ts| format!("<time datetime=\"{ts}\">{ts}</time>"))
        .unwrap_or_default();
    format!(
        r#"
        <article class="article-expander">
          <details class="article-expander__details">
            <summary><span class="article-expander__title">{}</span></summary>
            <div class="media-object">
              <div class="media-object__text"><span>{}</span><span>Read the full story</span></div>
            </div>
          </details>
          {time}
        </article>"#,
        article.title, article.description
    )
}

pub fn render_page(days: &[DaySpec]) -> String {
    let mut body = String::new();
    for day in days {
        body.push_str(&format!(
            "<section class=\"daily-content\"><h2>{}</h2>",
            day.date
        ));
        for source in &day.sources {
            body.push_str(&format!(
                "<div class=\"card__section\"><h3 class=\"source-heading\"><span class=\"source-heading__name\">{}</span></h3>",
                source.name
            ));
            for article in &source.articles {
                body.push_str(&render_article(article));
            }
            body.push_str("</div>");
        }
        body.push_str("</section>");
    }
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Daily News</title></head>
<body>
<main id="content">
  <input id="search-input" type="search" placeholder="Search articles">
  <p id="search-stats"></p>
  {body}
</main>
</body></html>"#
    )
}

/// 45 articles over 3 days and 3 sources. Articles 0..25 carry "news" in
/// their title, 25..45 are features. Article `i` is published `i` minutes
/// after 08:00 on 2025-05-06, so the 20 newest are the features.
pub fn forty_five_articles() -> String {
    let sources = ["CNN", "NPR", "Al Jazeera"];
    let days = (0..3)
        .map(|day| DaySpec {
            date: format!("2025-05-0{}", day + 4),
            sources: sources
                .iter()
                .enumerate()
                .map(|(s, name)| SourceSpec {
                    name: name.to_string(),
                    articles: (0..5)
                        .map(|k| {
                            let i = day * 15 + s * 5 + k;
                            ArticleSpec {
                                title: if i < 25 {
                                    format!("Breaking News item {i}")
                                } else {
                                    format!("Feature story {i}")
                                },
                                description: format!("Report number {i} from the desk"),
                                timestamp: Some(format!(
                                    "2025-05-06T{:02}:{:02}:00Z",
                                    8 + i / 60,
                                    i % 60
                                )),
                            }
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect::<Vec<_>>();
    render_page(&days)
}

pub fn attach<'a>(
    html: &'a Html,
    location: MemoryLocation,
    config: SearchConfig,
) -> NewsSearch<HtmlPage<'a>, MemoryLocation> {
    NewsSearch::attach(HtmlPage::new(html), location, config).expect("fixture page attaches")
}

/// Lowercased titles of the articles currently shown, in display order.
pub fn visible_titles(search: &NewsSearch<HtmlPage<'_>, MemoryLocation>) -> Vec<String> {
    search
        .rendered()
        .visible
        .iter()
        .filter_map(|&node| search.index().get(node))
        .map(|record| record.title.clone())
        .collect()
}

/// Article nodes whose own display is not `none`.
pub fn displayed_articles(search: &NewsSearch<HtmlPage<'_>, MemoryLocation>) -> Vec<PageNode> {
    let dom = search.dom();
    dom.query_all(None, &search.config().selectors.article)
        .into_iter()
        .filter(|&article| !dom.is_hidden(article))
        .collect()
}

/// Visible article count matches the rendered slice, and every day section
/// and source group is shown iff it holds a shown article.
pub fn assert_view_invariants(search: &NewsSearch<HtmlPage<'_>, MemoryLocation>) {
    let dom = search.dom();
    let selectors = &search.config().selectors;

    let displayed = displayed_articles(search);
    assert_eq!(displayed.len(), search.rendered().visible.len());
    for node in &search.rendered().visible {
        assert!(displayed.contains(node), "rendered article {node:?} is hidden");
    }

    let containers = dom
        .query_all(None, &selectors.day_section)
        .into_iter()
        .chain(dom.query_all(None, &selectors.source_group));
    for container in containers {
        let has_visible = dom
            .query_all(Some(container), &selectors.article)
            .into_iter()
            .any(|article| !dom.is_hidden(article));
        assert_eq!(
            dom.is_hidden(container),
            !has_visible,
            "container {container:?} visibility disagrees with its articles"
        );
    }
}
