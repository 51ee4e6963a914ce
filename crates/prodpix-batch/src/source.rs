use std::future::Future;

use prodpix_core::RetailerProfile;
use prodpix_search::{
    lookup_image, FetchError, ImageFetcher, ResolvedImage, SearchClient, SearchError,
};

/// What a batch run needs from the outside world for each row.
pub trait ImageSource {
    /// Resolves `term` to at most one image for the retailer.
    fn lookup(
        &self,
        profile: &RetailerProfile,
        term: &str,
    ) -> impl Future<Output = Result<Option<ResolvedImage>, SearchError>> + Send;

    /// Downloads the full image body.
    fn download(
        &self,
        image: &ResolvedImage,
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Live search API plus the shared image fetcher.
pub struct LiveImageSource {
    client: SearchClient,
    fetcher: ImageFetcher,
}

impl LiveImageSource {
    #[must_use]
    pub fn new(client: SearchClient, fetcher: ImageFetcher) -> Self {
        Self { client, fetcher }
    }
}

impl ImageSource for LiveImageSource {
    async fn lookup(
        &self,
        profile: &RetailerProfile,
        term: &str,
    ) -> Result<Option<ResolvedImage>, SearchError> {
        lookup_image(&self.client, profile, term).await
    }

    async fn download(&self, image: &ResolvedImage) -> Result<Vec<u8>, FetchError> {
        self.fetcher.fetch(image.as_str()).await?.into_bytes().await
    }
}
