//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use std::borrow::Cow;

    use futures::future::join_all;
    use wiremock::MockServer;

    use local_images::core::{transform_document, LocalImages};
    use local_images::parsers::html::SelectorList;

    use crate::common::{mount_image, public_path, session, stored_name, TestSite, GIF, JPEG, PNG};

    #[tokio::test]
    async fn rewrites_src_and_stores_bytes() {
        let server = MockServer::start().await;
        mount_image(&server, "/a/b/photo.jpg", JPEG, 1).await;

        let site = TestSite::new();
        let options = site.options();
        let locator = format!("{}/a/b/photo.jpg", server.uri());
        let raw = format!(
            r#"<!DOCTYPE html><html><head></head><body><img src="{locator}" alt="Photo"></body></html>"#
        );

        let result = transform_document(&raw, "_site/index.html", &options, &session(&options)).await;

        assert_eq!(
            result,
            format!(
                r#"<!DOCTYPE html><html><head></head><body><img src="{}" alt="Photo"></body></html>"#,
                public_path(&locator, "photo.jpg")
            )
        );
        assert_eq!(
            std::fs::read(site.asset_dir().join(stored_name(&locator, "photo.jpg"))).unwrap(),
            JPEG
        );
    }

    #[tokio::test]
    async fn relative_sources_are_left_alone() {
        let site = TestSite::new();
        let options = site.options();
        let raw = r#"<!DOCTYPE html><html><head></head><body><img src="/local/img.png"><img src="//cdn.example.com/x.png"><img src="data:image/gif;base64,R0lGODlhAQABAAAAACw="></body></html>"#;

        let result = transform_document(raw, "_site/index.html", &options, &session(&options)).await;

        assert_eq!(result, raw);
        assert!(site.stored_files().is_empty());
    }

    #[tokio::test]
    async fn no_matching_nodes_returns_input_untouched() {
        let site = TestSite::new();
        let options = site.options();
        let raw = "\n  <p>No pictures here</p>\n\n";

        let result = transform_document(raw, "_site/about.html", &options, &session(&options)).await;

        assert!(matches!(result, Cow::Borrowed(content) if std::ptr::eq(content, raw)));
    }

    #[tokio::test]
    async fn non_html_outputs_are_skipped() {
        let server = MockServer::start().await;
        mount_image(&server, "/photo.jpg", JPEG, 0).await;

        let site = TestSite::new();
        let options = site.options();
        let raw = format!(r#"<img src="{}/photo.jpg">"#, server.uri());

        let result = transform_document(&raw, "_site/feed.xml", &options, &session(&options)).await;

        assert_eq!(result, raw);
    }

    #[tokio::test]
    async fn identical_urls_are_fetched_and_written_once() {
        let server = MockServer::start().await;
        mount_image(&server, "/shared.png", PNG, 1).await;

        let site = TestSite::new();
        let options = site.options();
        let locator = format!("{}/shared.png", server.uri());
        let raw = format!(
            r#"<html><body><img id="a" src="{locator}"><img id="b" src="{locator}"><img srcset="{locator} 2x"></body></html>"#
        );

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        let local = public_path(&locator, "shared.png");
        assert_eq!(result.matches(&format!(r#"src="{local}""#)).count(), 2);
        assert!(result.contains(&format!(r#"srcset="{local} 2x""#)));
        assert_eq!(site.stored_files(), vec![stored_name(&locator, "shared.png")]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_documents_sharing_an_image_are_all_rewritten() {
        let server = MockServer::start().await;
        mount_image(&server, "/banner.png", PNG, 8).await;

        let site = TestSite::new();
        let images = LocalImages::with_options(site.options()).unwrap();
        let locator = format!("{}/banner.png", server.uri());
        let raw = format!(r#"<html><body><img src="{locator}"></body></html>"#);
        let output_paths: Vec<String> = (0..8).map(|i| format!("_site/post-{i}.html")).collect();

        let results = join_all(
            output_paths
                .iter()
                .map(|output_path| images.transform(&raw, output_path)),
        )
        .await;

        let local = public_path(&locator, "banner.png");
        for result in &results {
            assert!(result.contains(&format!(r#"src="{local}""#)), "{result}");
        }
        assert_eq!(site.stored_files(), vec![stored_name(&locator, "banner.png")]);
    }

    #[tokio::test]
    async fn srcset_entries_keep_order_and_descriptors() {
        let server = MockServer::start().await;
        mount_image(&server, "/small.jpg", JPEG, 1).await;
        mount_image(&server, "/large", PNG, 1).await;

        let site = TestSite::new();
        let options = site.options();
        let small = format!("{}/small.jpg", server.uri());
        let large = format!("{}/large", server.uri());
        let raw = format!(
            r#"<html><body><img srcset="{small} 480w, /static/medium.jpg 640w, {large} 800w"></body></html>"#
        );

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        assert!(result.contains(&format!(
            r#"srcset="{} 480w, /static/medium.jpg 640w, {} 800w""#,
            public_path(&small, "small.jpg"),
            public_path(&large, "large.png")
        )));
    }

    #[tokio::test]
    async fn data_srcset_is_used_when_srcset_is_absent() {
        let server = MockServer::start().await;
        mount_image(&server, "/lazy.gif", GIF, 1).await;

        let site = TestSite::new();
        let options = site.options();
        let locator = format!("{}/lazy.gif", server.uri());
        let raw = format!(r#"<html><body><img data-srcset="{locator} 1x"></body></html>"#);

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        assert!(result.contains(&format!(
            r#"data-srcset="{} 1x""#,
            public_path(&locator, "lazy.gif")
        )));
    }

    #[tokio::test]
    async fn first_present_attribute_is_rewritten() {
        let server = MockServer::start().await;
        mount_image(&server, "/lazy.jpg", JPEG, 1).await;

        let site = TestSite::new();
        let options = site
            .options()
            .with_source_attributes(vec!["data-src".to_string(), "src".to_string()]);
        let locator = format!("{}/lazy.jpg", server.uri());
        let raw = format!(
            r#"<html><body><img src="/placeholder.gif" data-src="{locator}"></body></html>"#
        );

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        assert!(result.contains(r#"src="/placeholder.gif""#));
        assert!(result.contains(&format!(
            r#"data-src="{}""#,
            public_path(&locator, "lazy.jpg")
        )));
    }

    #[tokio::test]
    async fn open_graph_images_are_localized() {
        let server = MockServer::start().await;
        mount_image(&server, "/og.png", PNG, 1).await;
        mount_image(&server, "/inline.png", PNG, 1).await;

        let site = TestSite::new();
        let options = site
            .options()
            .with_selector(SelectorList::parse("img, meta[property='og:image']").unwrap())
            .with_source_attributes(vec!["src".to_string(), "content".to_string()]);
        let og = format!("{}/og.png", server.uri());
        let inline = format!("{}/inline.png", server.uri());
        let raw = format!(
            r#"<html><head><meta property="og:image" content="{og}"><meta name="description" content="{inline}"></head><body><img src="{inline}"></body></html>"#
        );

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        assert!(result.contains(&format!(
            r#"<meta property="og:image" content="{}">"#,
            public_path(&og, "og.png")
        )));
        assert!(result.contains(&format!(r#"<meta name="description" content="{inline}">"#)));
        assert!(result.contains(&format!(r#"<img src="{}">"#, public_path(&inline, "inline.png"))));
    }

    #[tokio::test]
    async fn reusing_existing_assets_is_idempotent() {
        let server = MockServer::start().await;
        mount_image(&server, "/photo", JPEG, 1).await;
        mount_image(&server, "/hero.png", PNG, 1).await;

        let site = TestSite::new();
        let options = site.options().with_use_existing(true);
        let photo = format!("{}/photo", server.uri());
        let hero = format!("{}/hero.png", server.uri());
        let raw = format!(
            r#"<html><body><img src="{photo}"><img srcset="{hero} 2x"></body></html>"#
        );

        let first = transform_document(&raw, "index.html", &options, &session(&options)).await;
        let second = transform_document(&raw, "index.html", &options, &session(&options)).await;

        assert_eq!(first, second);
        assert!(first.contains(&public_path(&photo, "photo.jpg")));
        assert_eq!(site.stored_files().len(), 2);
    }

    #[tokio::test]
    async fn query_strings_produce_distinct_assets() {
        let server = MockServer::start().await;
        mount_image(&server, "/photo.jpg", JPEG, 2).await;

        let site = TestSite::new();
        let options = site.options();
        let first = format!("{}/photo.jpg?v=1", server.uri());
        let second = format!("{}/photo.jpg?v=2", server.uri());
        let raw = format!(r#"<html><body><img src="{first}"><img src="{second}"></body></html>"#);

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        assert!(result.contains(&public_path(&first, "photo.jpg")));
        assert!(result.contains(&public_path(&second, "photo.jpg")));
        assert_eq!(site.stored_files().len(), 2);
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use wiremock::MockServer;

    use local_images::core::transform_document;

    use crate::common::{mount_image, mount_status, public_path, session, TestSite, JPEG};

    #[tokio::test]
    async fn unreachable_image_keeps_remote_source() {
        let server = MockServer::start().await;
        mount_status(&server, "/missing.jpg", 404).await;
        mount_image(&server, "/present.jpg", JPEG, 1).await;

        let site = TestSite::new();
        let options = site.options();
        let missing = format!("{}/missing.jpg", server.uri());
        let present = format!("{}/present.jpg", server.uri());
        let raw = format!(
            r#"<html><body><img src="{missing}"><img src="{present}"></body></html>"#
        );

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        assert!(result.contains(&format!(r#"<img src="{missing}">"#)));
        assert!(result.contains(&format!(
            r#"<img src="{}">"#,
            public_path(&present, "present.jpg")
        )));
        assert_eq!(site.stored_files().len(), 1);
    }

    #[tokio::test]
    async fn failed_srcset_entry_is_dropped() {
        let server = MockServer::start().await;
        mount_image(&server, "/a.jpg", JPEG, 1).await;
        mount_status(&server, "/b.jpg", 404).await;

        let site = TestSite::new();
        let options = site.options();
        let a = format!("{}/a.jpg", server.uri());
        let b = format!("{}/b.jpg", server.uri());
        let raw = format!(r#"<html><body><img srcset="{a} 1x, {b} 2x"></body></html>"#);

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        assert!(result.contains(&format!(r#"srcset="{} 1x""#, public_path(&a, "a.jpg"))));
        assert!(!result.contains("b.jpg"));
    }

    #[tokio::test]
    async fn srcset_without_survivors_is_removed() {
        let server = MockServer::start().await;
        mount_status(&server, "/a.jpg", 500).await;

        let site = TestSite::new();
        let options = site.options();
        let raw = format!(
            r#"<html><body><img alt="x" srcset="{}/a.jpg 1x"></body></html>"#,
            server.uri()
        );

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        assert!(result.contains(r#"<img alt="x">"#));
    }

    #[tokio::test]
    async fn unknown_content_keeps_remote_source() {
        let server = MockServer::start().await;
        mount_image(&server, "/blob", b"definitely not an image", 1).await;

        let site = TestSite::new();
        let options = site.options();
        let locator = format!("{}/blob", server.uri());
        let raw = format!(r#"<html><body><img src="{locator}"></body></html>"#);

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        assert!(result.contains(&format!(r#"<img src="{locator}">"#)));
        assert!(site.stored_files().is_empty());
    }

    #[tokio::test]
    async fn unwritable_asset_directory_keeps_remote_source() {
        let server = MockServer::start().await;
        mount_image(&server, "/photo.jpg", JPEG, 1).await;

        let site = TestSite::new();
        site.write("assets", "a file where the asset directory should be");
        let options = site.options();
        let locator = format!("{}/photo.jpg", server.uri());
        let raw = format!(r#"<html><body><img src="{locator}"></body></html>"#);

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        assert!(result.contains(&format!(r#"<img src="{locator}">"#)));
    }

    #[tokio::test]
    async fn connection_refused_keeps_remote_source() {
        let site = TestSite::new();
        let options = site.options();
        let raw = r#"<html><body><img src="http://127.0.0.1:9/photo.jpg"></body></html>"#;

        let result = transform_document(raw, "index.html", &options, &session(&options)).await;

        assert!(result.contains(r#"<img src="http://127.0.0.1:9/photo.jpg">"#));
    }
}
