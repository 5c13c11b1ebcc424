use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

const DEFAULT_MIME: &str = "image/jpeg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Платформа клиента. На `Web` доступ к медиатеке не запрашивается.
pub enum Platform {
    /// Нативное приложение или CLI.
    Native,
    /// Браузер.
    Web,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Результат выбора в медиатеке.
pub struct PickedImage {
    /// Локальный адрес файла.
    pub uri: String,
    /// Base64, если медиатека отдала его сразу.
    pub base64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Выбранная обложка, готовая к отправке.
pub struct SelectedImage {
    /// Локальный адрес файла.
    pub uri: String,
    /// Содержимое файла в base64.
    pub base64: String,
}

impl SelectedImage {
    /// MIME-тип по расширению файла: `image/<ext>`, `jpg` становится `jpeg`,
    /// без расширения `image/jpeg`.
    pub fn mime_type(&self) -> String {
        let Some(ext) = Path::new(&self.uri)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
        else {
            return DEFAULT_MIME.to_string();
        };

        match ext.to_ascii_lowercase().as_str() {
            "jpg" => DEFAULT_MIME.to_string(),
            ext => format!("image/{ext}"),
        }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.base64)
    }
}

#[async_trait]
/// Медиатека и файловая система устройства.
pub trait MediaLibrary: Send + Sync {
    /// Запрашивает доступ к медиатеке. `false` означает отказ.
    async fn request_permission(&self) -> ClientResult<bool>;
    /// Открывает выбор изображения. `None`, если пользователь отменил выбор.
    async fn pick_image(&self) -> ClientResult<Option<PickedImage>>;
    /// Читает файл и кодирует его в base64.
    async fn read_as_base64(&self, uri: &str) -> ClientResult<String>;
}

/// Выбирает изображение и получает его base64.
///
/// На нативной платформе сначала запрашивается доступ; при отказе
/// возвращается `ClientError::PermissionDenied`. Base64 от медиатеки
/// используется как есть, иначе файл читается и кодируется отдельно.
pub async fn acquire_image<M>(media: &M, platform: Platform) -> ClientResult<Option<SelectedImage>>
where
    M: MediaLibrary + ?Sized,
{
    if platform == Platform::Native && !media.request_permission().await? {
        return Err(ClientError::PermissionDenied);
    }

    let Some(picked) = media.pick_image().await? else {
        debug!("image selection cancelled");
        return Ok(None);
    };

    let base64 = match picked.base64 {
        Some(base64) => base64,
        None => media.read_as_base64(&picked.uri).await?,
    };

    Ok(Some(SelectedImage {
        uri: picked.uri,
        base64,
    }))
}

/// Кодирует содержимое файла в стандартный base64 с паддингом.
/// Один и тот же файл всегда даёт одну и ту же строку.
pub async fn encode_file(path: impl AsRef<Path>) -> ClientResult<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(STANDARD.encode(bytes))
}

#[derive(Debug, Clone)]
/// Медиатека поверх заранее выбранного локального файла (для CLI).
pub struct FsMediaLibrary {
    path: PathBuf,
}

impl FsMediaLibrary {
    /// Создаёт медиатеку, которая всегда "выбирает" файл `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MediaLibrary for FsMediaLibrary {
    async fn request_permission(&self) -> ClientResult<bool> {
        match tokio::fs::File::open(&self.path).await {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == ErrorKind::PermissionDenied => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn pick_image(&self) -> ClientResult<Option<PickedImage>> {
        Ok(Some(PickedImage {
            uri: self.path.to_string_lossy().into_owned(),
            base64: None,
        }))
    }

    async fn read_as_base64(&self, uri: &str) -> ClientResult<String> {
        encode_file(uri).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::{
        FsMediaLibrary, MediaLibrary, PickedImage, Platform, SelectedImage, acquire_image,
        encode_file,
    };
    use crate::error::{ClientError, ClientResult};

    struct FakeMedia {
        granted: bool,
        picked: Option<PickedImage>,
        permission_requests: AtomicUsize,
        reads: AtomicUsize,
    }

    impl FakeMedia {
        fn new(granted: bool, picked: Option<PickedImage>) -> Self {
            Self {
                granted,
                picked,
                permission_requests: AtomicUsize::new(0),
                reads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MediaLibrary for FakeMedia {
        async fn request_permission(&self) -> ClientResult<bool> {
            self.permission_requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.granted)
        }

        async fn pick_image(&self) -> ClientResult<Option<PickedImage>> {
            Ok(self.picked.clone())
        }

        async fn read_as_base64(&self, _uri: &str) -> ClientResult<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok("RklMRQ==".to_string())
        }
    }

    fn picked(base64: Option<&str>) -> Option<PickedImage> {
        Some(PickedImage {
            uri: "file:///photos/cover.PNG".to_string(),
            base64: base64.map(str::to_string),
        })
    }

    #[test]
    fn mime_type_follows_extension() {
        let image = |uri: &str| SelectedImage {
            uri: uri.to_string(),
            base64: "AAAA".to_string(),
        };

        assert_eq!(image("/tmp/cover.png").mime_type(), "image/png");
        assert_eq!(image("/tmp/cover.JPG").mime_type(), "image/jpeg");
        assert_eq!(image("/tmp/cover.jpeg").mime_type(), "image/jpeg");
        assert_eq!(image("/tmp/cover").mime_type(), "image/jpeg");
        assert_eq!(
            image("/tmp/cover.webp").data_url(),
            "data:image/webp;base64,AAAA"
        );
    }

    #[tokio::test]
    async fn denied_permission_aborts_before_picking() {
        let media = FakeMedia::new(false, picked(Some("AAAA")));

        let result = acquire_image(&media, Platform::Native).await;

        assert!(matches!(result, Err(ClientError::PermissionDenied)));
        assert_eq!(media.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn web_platform_skips_permission_prompt() {
        let media = FakeMedia::new(false, picked(Some("AAAA")));

        let selected = acquire_image(&media, Platform::Web)
            .await
            .expect("acquire")
            .expect("selected");

        assert_eq!(selected.base64, "AAAA");
        assert_eq!(media.permission_requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn picker_base64_is_preferred_over_reading_file() {
        let media = FakeMedia::new(true, picked(Some("AAAA")));

        let selected = acquire_image(&media, Platform::Native)
            .await
            .expect("acquire")
            .expect("selected");

        assert_eq!(selected.base64, "AAAA");
        assert_eq!(media.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn file_is_read_when_picker_has_no_base64() {
        let media = FakeMedia::new(true, picked(None));

        let selected = acquire_image(&media, Platform::Native)
            .await
            .expect("acquire")
            .expect("selected");

        assert_eq!(selected.base64, "RklMRQ==");
        assert_eq!(selected.mime_type(), "image/png");
        assert_eq!(media.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancelled_pick_yields_nothing() {
        let media = FakeMedia::new(true, None);

        assert_eq!(
            acquire_image(&media, Platform::Native).await.expect("acquire"),
            None
        );
    }

    #[tokio::test]
    async fn encoding_same_file_twice_is_identical() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cover.jpg");
        std::fs::write(&path, [0xff_u8, 0xd8, 0xff, 0xe0, 0x00, 0x10]).expect("write");

        let first = encode_file(&path).await.expect("encode");
        let second = encode_file(&path).await.expect("encode");

        assert_eq!(first, second);
        assert_eq!(first, "/9j/4AAQ");
    }

    #[tokio::test]
    async fn fs_media_library_reads_selected_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cover.png");
        std::fs::write(&path, b"FILE").expect("write");
        let media = FsMediaLibrary::new(&path);

        let selected = acquire_image(&media, Platform::Native)
            .await
            .expect("acquire")
            .expect("selected");

        assert_eq!(selected.base64, "RklMRQ==");
        assert_eq!(selected.mime_type(), "image/png");
    }

    #[tokio::test]
    async fn fs_media_library_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let media = FsMediaLibrary::new(dir.path().join("missing.png"));

        let result = acquire_image(&media, Platform::Native).await;

        assert!(matches!(result, Err(ClientError::Io(_))));
    }
}
