use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use hostgate::app::Application;
use hostgate::shutdown::ShutdownManager;
use hostgate_core::AppConfig;
use hostgate_infrastructure::PlanFile;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let matches = Command::new("hostgate")
        .version("1.0.0")
        .about("受配置版本门控的主机任务分配调度器")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径，未指定时按默认路径查找"),
        )
        .arg(
            Arg::new("plan")
                .short('p')
                .long("plan")
                .value_name("FILE")
                .help("计划文件路径（JSON）")
                .required(true),
        )
        .arg(
            Arg::new("process-class")
                .long("process-class")
                .value_name("CLASS")
                .help("查询主机时使用的处理类型")
                .required(true),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别，覆盖配置文件")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式，覆盖配置文件")
                .value_parser(["json", "pretty"]),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("演练模式：只记录分发日志，不输出分发记录")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(String::as_str);
    let plan_path = matches
        .get_one::<String>("plan")
        .context("缺少计划文件参数")?;
    let process_class = matches
        .get_one::<String>("process-class")
        .context("缺少处理类型参数")?;

    // 加载配置
    let mut config = AppConfig::load(config_path).context("加载配置失败")?;
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.observability.log_level = level.clone();
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        config.observability.log_format = format.clone();
    }

    // 初始化日志系统
    init_logging(&config.observability.log_level, &config.observability.log_format)?;
    init_metrics(&config)?;

    info!("启动主机任务分配调度器");
    info!("计划文件: {plan_path}");
    info!("处理类型: {process_class}");

    let plan = PlanFile::load(plan_path)
        .with_context(|| format!("加载计划文件失败: {plan_path}"))?;

    // 创建优雅关闭管理器
    let shutdown_manager = ShutdownManager::new();
    let signal_listener = shutdown_manager.listen_for_signals();

    let app = Application::new(config).with_dry_run(matches.get_flag("dry-run"));
    let result = app
        .run(plan, process_class, shutdown_manager.token(), std::io::stdout())
        .await;

    shutdown_manager.shutdown();
    if let Err(e) = signal_listener.await {
        warn!("信号监听任务异常退出: {e}");
    }

    let (summary, _) = result?;
    info!(
        "调度器已退出: 已分发 {} 个任务，{} 个被门控拦下，{} 个仍待分配",
        summary.dispatched,
        summary.held_back.len(),
        summary.pending.len()
    );
    Ok(())
}

/// 初始化日志系统
fn init_logging(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // 标准输出留给分发记录，日志写到标准错误
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("初始化JSON日志格式失败")?;
        }
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("初始化Pretty日志格式失败")?;
        }
        _ => {
            return Err(anyhow::anyhow!("不支持的日志格式: {log_format}"));
        }
    }

    Ok(())
}

/// 安装Prometheus指标导出器
fn init_metrics(config: &AppConfig) -> Result<()> {
    if !config.observability.metrics_enabled {
        return Ok(());
    }

    let addr = config.observability.metrics_socket_addr()?;
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("安装Prometheus指标导出器失败")?;
    info!("指标导出已启用: http://{addr}/metrics");
    Ok(())
}
