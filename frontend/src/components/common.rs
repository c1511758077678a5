//! 页面公用的加载状态与调用封装

use crate::auth::AuthContext;
use inventory_console::ApiResult;
use inventory_shared::protocol::ApiRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 页面数据的加载状态
#[derive(Debug, Clone, PartialEq)]
pub enum Load<T> {
    Loading,
    Ready(T),
    Failed,
}

/// 在后台发起一次类型化调用
///
/// 401 已由全局拦截器处理（清会话并跳转），回调只需处理页面自身的展示。
pub fn spawn_call<R>(
    ctx: AuthContext,
    req: R,
    on_done: impl FnOnce(ApiResult<R::Response>) + 'static,
) where
    R: ApiRequest + 'static,
{
    let Some(api) = ctx.api() else {
        return;
    };
    spawn_local(async move {
        on_done(api.call(&req).await);
    });
}

/// 把调用结果写入加载状态信号，失败只显示固定提示
pub fn load_into<R>(ctx: AuthContext, req: R, target: WriteSignal<Load<R::Response>>)
where
    R: ApiRequest + 'static,
    R::Response: Send + Sync + 'static,
{
    target.set(Load::Loading);
    spawn_call(ctx, req, move |result| match result {
        Ok(data) => {
            target.try_set(Load::Ready(data));
        }
        Err(e) => {
            tracing::warn!("load failed: {}", e);
            target.try_set(Load::Failed);
        }
    });
}

/// 加载失败时的固定提示
#[component]
pub fn LoadFailed(#[prop(into)] what: String) -> impl IntoView {
    view! {
        <div role="alert" class="alert alert-error">
            <span>{format!("Failed to load {}. Please try again later.", what)}</span>
        </div>
    }
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}
