//! 对象缓存层
//!
//! 后端通过 `declare_object_cache_plugin!` 在加载期注册到全局表，
//! 启动时按 `cache.type` 选择。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明并注册一个缓存后端
///
/// 要求类型实现 `new() -> Result<Self, String>` 与 [`ObjectCache`]。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::AcademyError::cache_connection)?;
                        Ok::<_, $crate::errors::AcademyError>(
                            Box::new(cache) as Box<dyn $crate::cache::ObjectCache>
                        )
                    }) as $crate::cache::register::BoxedObjectCacheFuture
                }),
            );
        }
    };
}
