//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use wiremock::MockServer;

    use local_images::core::transform_document;
    use local_images::utils::url::is_external_url;

    use crate::common::{mount_image, session, stored_name, TestSite, PNG};

    #[test]
    fn external_url_classification() {
        assert!(is_external_url("https://images.unsplash.com/photo-1?w=600"));
        assert!(!is_external_url("./photo.jpg"));
        assert!(!is_external_url("ftp://example.com/photo.jpg"));
        assert!(!is_external_url("mailto:someone@example.com"));
    }

    #[tokio::test]
    async fn file_names_are_decoded_on_disk_and_encoded_in_markup() {
        let server = MockServer::start().await;
        mount_image(&server, "/summer%20trip.png", PNG, 1).await;

        let site = TestSite::new();
        let options = site.options();
        let locator = format!("{}/summer%20trip.png", server.uri());
        let raw = format!(r#"<html><body><img src="{locator}"></body></html>"#);

        let result = transform_document(&raw, "index.html", &options, &session(&options)).await;

        let on_disk = stored_name(&locator, "summer trip.png");
        assert_eq!(site.stored_files(), vec![on_disk.clone()]);
        assert!(result.contains(&format!(
            r#"src="/assets/img/{}""#,
            on_disk.replace(' ', "%20")
        )));
    }
}
