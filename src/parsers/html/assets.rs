//! HTML 图片资源本地化模块
//!
//! 本模块负责单个远程资源的完整处理流程：
//! - 根据定位符计算内容寻址文件名
//! - （可选）复用资源目录中已存在的文件
//! - 下载、补全扩展名、写入资源目录
//!
//! 同一文档中的相同定位符通过 [`AssetRegistry`] 合并为一次处理，
//! 所有引用共享同一个结果，也不会出现两个任务同时写同一路径的情况。

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tokio::sync::OnceCell;

use crate::core::{LocalImagesError, LocalImagesOptions};
use crate::network::session::Session;
use crate::network::store::{find_existing, store};
use crate::utils::media::resolve_extension;
use crate::utils::naming::derive_base_name;
use crate::utils::url::public_asset_path;

/// 已经写入（或复用）到资源目录中的本地资源
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalAsset {
    /// 原始远程定位符
    pub locator: String,
    /// 定位符哈希
    pub hash: String,
    /// 最终文件名 `{hash}-{base}[.{ext}]`
    pub file_name: String,
    /// 磁盘上的绝对（或相对于工作目录的）路径
    pub output_path: PathBuf,
    /// 写回 HTML 的公共路径
    pub public_path: String,
    /// 是否复用了之前运行留下的文件
    pub reused: bool,
}

/// 单个资源的处理结果
pub type AssetOutcome = Result<LocalAsset, LocalImagesError>;

fn local_asset(
    locator: &str,
    hash: String,
    output_path: PathBuf,
    options: &LocalImagesOptions,
    reused: bool,
) -> LocalAsset {
    let file_name = file_name_of(&output_path);
    let public_path = public_asset_path(&options.asset_path, &file_name);

    LocalAsset {
        locator: locator.to_string(),
        hash,
        file_name,
        output_path,
        public_path,
        reused,
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 下载并保存一个远程资源
///
/// 启用 `use_existing` 时先在资源目录中查找同名（或仅多出扩展名的）文件，
/// 找到则直接复用，不发起任何网络请求。
pub async fn localize_asset(
    locator: &str,
    options: &LocalImagesOptions,
    session: &Session,
) -> AssetOutcome {
    let name = derive_base_name(locator);
    let asset_dir = options.asset_dir();

    if options.use_existing {
        match find_existing(&asset_dir, &name.stem()).await {
            Ok(Some(existing)) => {
                tracing::debug!(
                    "Re-using {} for {}",
                    existing.display(),
                    locator
                );
                return Ok(local_asset(locator, name.hash, existing, options, true));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(
                    "Unable to look for existing assets in {}: {}",
                    asset_dir.display(),
                    e
                );
            }
        }
    }

    let data = session.fetch(locator).await?;
    let resolved_base = resolve_extension(&name.base, &data)?;
    let output_path = asset_dir.join(name.file_name(&resolved_base));

    store(&output_path, &data).await?;

    if options.verbose {
        tracing::info!("Saved {} to {}", resolved_base, output_path.display());
    } else {
        tracing::debug!("Saved {} to {}", resolved_base, output_path.display());
    }

    Ok(local_asset(locator, name.hash, output_path, options, false))
}

/// 单个文档范围内的资源处理登记表
///
/// 每个定位符对应一个只初始化一次的结果单元；第一个引用驱动处理流程，
/// 其余引用等待同一结果。失败只在流程内部记录一次日志。
#[derive(Default)]
pub struct AssetRegistry {
    pipelines: RefCell<HashMap<String, Rc<OnceCell<AssetOutcome>>>>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 本地化定位符，同一定位符只处理一次
    pub async fn localize(
        &self,
        locator: &str,
        options: &LocalImagesOptions,
        session: &Session,
    ) -> AssetOutcome {
        let pipeline = {
            let mut pipelines = self.pipelines.borrow_mut();
            pipelines.entry(locator.to_string()).or_default().clone()
        };

        pipeline
            .get_or_init(|| async {
                let outcome = localize_asset(locator, options, session).await;
                match &outcome {
                    Err(e @ LocalImagesError::Fetch { .. }) => tracing::warn!("{}", e),
                    Err(e) => tracing::warn!("Couldn't localize image {}: {}", locator, e),
                    Ok(_) => {}
                }
                outcome
            })
            .await
            .clone()
    }

    /// 已登记的不同定位符数量
    pub fn len(&self) -> usize {
        self.pipelines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.borrow().is_empty()
    }
}
