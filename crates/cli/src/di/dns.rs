use dnsforward_application::services::LocalOverrideResolver;
use dnsforward_application::use_cases::HandleDnsQueryUseCase;
use dnsforward_domain::{Config, CorrelationIdGenerator, OverrideTable};
use dnsforward_infrastructure::dns::{
    AuditEmitter, AuditLogger, AuditWriter, BackendRegistry, DnsServerHandler,
    ForwardingDispatcher, Strategy,
};
use dnsforward_infrastructure::system::load_override_file;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

pub struct DnsServices {
    pub handler: DnsServerHandler,
    pub emitter: AuditEmitter,
    pub audit_task: JoinHandle<()>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        info!("Initializing DNS forwarding services");

        let registry = Arc::new(BackendRegistry::from_config(&config.dns)?);
        let overrides = Self::load_overrides(config)?;

        let (emitter, audit_task) = Self::setup_audit_writer(config)?;
        let audit = AuditLogger::new(emitter.clone(), config.logging.log_queries);

        let strategy = Strategy::from_mode(config.dns.resolve_mode, config.dns.cancel_losing_backends);
        let dispatcher = ForwardingDispatcher::new(registry.clone(), strategy, audit.clone());

        info!(
            backends = registry.len(),
            resolve_mode = %config.dns.resolve_mode,
            strategy = dispatcher.strategy_name(),
            cancel_losing_backends = config.dns.cancel_losing_backends,
            overrides = overrides.table().len(),
            "DNS forwarding configured"
        );

        let use_case = Arc::new(HandleDnsQueryUseCase::new(
            CorrelationIdGenerator::new(),
            overrides,
            Arc::new(dispatcher),
            Arc::new(audit),
        ));

        Ok(Self {
            handler: DnsServerHandler::new(use_case),
            emitter,
            audit_task,
        })
    }

    fn load_overrides(config: &Config) -> anyhow::Result<LocalOverrideResolver> {
        let table = match &config.dns.override_file {
            Some(path) => load_override_file(path)?,
            None => OverrideTable::new(),
        };
        Ok(LocalOverrideResolver::new(Arc::new(table)))
    }

    fn setup_audit_writer(config: &Config) -> anyhow::Result<(AuditEmitter, JoinHandle<()>)> {
        let writer = match &config.logging.audit_log {
            Some(path) => {
                info!(path = %path, "Writing audit records to file");
                AuditWriter::append_to(path)
                    .map_err(|e| anyhow::anyhow!("Failed to open audit log {}: {}", path, e))?
            }
            None => AuditWriter::stderr(),
        };

        let (emitter, rx) = AuditEmitter::new_enabled();
        Ok((emitter, writer.start(rx)))
    }
}
