//! Turns fetched items into the rendered front page. Display-only: nothing
//! here is cached or fed back into the fetch pipeline.

pub(crate) struct DisplayStory {
    pub(crate) item: crate::hn_api::Item,
    pub(crate) host: String,
}

impl DisplayStory {
    pub(crate) fn from_item(item: crate::hn_api::Item) -> Self {
        let host = item
            .url
            .as_deref()
            .and_then(|url| reqwest::Url::parse(url).ok())
            .and_then(|url| {
                url.host_str()
                    .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
            })
            .unwrap_or_default();

        Self { item, host }
    }
}

pub(crate) fn render(stories: Vec<crate::hn_api::Item>, elapsed: std::time::Duration) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <title>Quiet Hacker News</title>\n\
         <style>\n\
         body { font-family: sans-serif; background: #f6f6ef; margin: 0 auto; max-width: 48rem; }\n\
         h1 { background: #ff6600; color: white; font-size: 1.1rem; padding: 0.4rem; }\n\
         ol { line-height: 1.6; }\n\
         a { color: #000; text-decoration: none; }\n\
         .meta { color: #828282; font-size: 0.8rem; }\n\
         footer { color: #828282; font-size: 0.8rem; padding: 1rem 0; }\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <h1>Quiet Hacker News</h1>\n\
         <ol>\n",
    );

    for story in stories.into_iter().map(DisplayStory::from_item) {
        let comments = story.item.descendants.unwrap_or(0);
        page.push_str(&format!(
            "<li><a href=\"{}\">{}</a> <span class=\"meta\">({})</span><br>\
             <span class=\"meta\">{} points by {} | {} comments</span></li>\n",
            html_escape::encode_double_quoted_attribute(story.item.url.as_deref().unwrap_or("")),
            html_escape::encode_safe(&story.item.title),
            html_escape::encode_safe(&story.host),
            story.item.score,
            html_escape::encode_safe(story.item.by.as_deref().unwrap_or("unknown")),
            comments,
        ));
    }

    page.push_str(&format!(
        "</ol>\n<footer>generated in {} ms</footer>\n</body>\n</html>\n",
        elapsed.as_millis()
    ));

    page
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story_with_url(url: Option<&str>) -> crate::hn_api::Item {
        crate::hn_api::Item {
            id: 1,
            item_type: "story".to_string(),
            title: "A story".to_string(),
            url: url.map(str::to_string),
            score: 42,
            by: Some("pg".to_string()),
            descendants: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_host_strips_www_prefix() {
        let story = DisplayStory::from_item(story_with_url(Some(
            "https://www.example.com/2026/01/some-post",
        )));
        assert_eq!(story.host, "example.com");
    }

    #[test]
    fn test_host_without_www_kept_as_is() {
        let story = DisplayStory::from_item(story_with_url(Some("https://blog.rust-lang.org/x")));
        assert_eq!(story.host, "blog.rust-lang.org");
    }

    #[test]
    fn test_unparseable_url_renders_empty_host() {
        let story = DisplayStory::from_item(story_with_url(Some("not a url")));
        assert_eq!(story.host, "");
    }

    #[test]
    fn test_render_escapes_titles() {
        let mut item = story_with_url(Some("https://example.com"));
        item.title = "Why <script> & friends are bad".to_string();

        let page = render(vec![item], std::time::Duration::from_millis(3));

        assert!(page.contains("Why &lt;script&gt; &amp; friends are bad"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_render_escapes_single_quotes() {
        let mut item = story_with_url(Some("https://example.com"));
        item.title = "It's a 'quoted' title".to_string();

        let page = render(vec![item], std::time::Duration::from_millis(3));

        assert!(page.contains("It&#x27;s a &#x27;quoted&#x27; title"));
        assert!(!page.contains("It's"));
    }

    #[test]
    fn test_render_lists_stories_and_footer() {
        let page = render(
            vec![story_with_url(Some("https://example.com"))],
            std::time::Duration::from_millis(12),
        );

        assert!(page.contains("42 points by pg | 7 comments"));
        assert!(page.contains("generated in 12 ms"));
    }
}
