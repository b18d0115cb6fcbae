use std::fs::File;
use std::path::{
    Path,
    PathBuf,
};

use kube::api::{
    Api,
    ListParams,
};
use sk_core::prelude::*;
use sk_snapshot::{
    snapshot_cluster,
    ClusterView,
    ClusterViewProvider,
    EncodeMode,
    NodeInfo,
    SnapshotConfig,
};

#[derive(clap::Args)]
pub struct Args {
    #[arg(long, help = "YAML or JSON file holding the pod that could not be scheduled")]
    pub pod_file: PathBuf,

    #[arg(
        long,
        long_help = "YAML or JSON List of nodes and pods, e.g. from `kubectl get nodes,pods -A -o yaml`;\n\
                     if omitted, nodes and pods are listed from the cluster in the current kubeconfig context"
    )]
    pub cluster_file: Option<PathBuf>,

    #[arg(short, long, help = "snapshot destination [default: /tmp/cluster.csv]")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "write to a new file per pod and invocation instead of overwriting the destination")]
    pub unique_output: bool,

    #[arg(long, help = "fail instead of writing [] when a list column can't be encoded")]
    pub strict: bool,

    #[arg(long, help = "YAML file with snapshot settings; flags take precedence")]
    pub config: Option<PathBuf>,
}

// Listing happens up front (possibly asynchronously); the snapshot itself only sees the result.
pub(crate) struct Listed(pub anyhow::Result<ClusterView>);

impl ClusterViewProvider for Listed {
    fn list_nodes(&self) -> anyhow::Result<Vec<NodeInfo>> {
        match &self.0 {
            Ok(view) => view.list_nodes(),
            Err(err) => Err(anyhow!("{err:#}")),
        }
    }
}

pub async fn cmd(args: &Args) -> EmptyResult {
    let config = build_config(args)?;
    let pod = load_pod(&args.pod_file)?;

    let listed = match &args.cluster_file {
        Some(path) => load_cluster_file(path),
        None => list_live_cluster().await,
    };

    let report = snapshot_cluster(&Listed(listed), &pod, &config)?;
    if let Some(err) = &report.listing_error {
        error!("cluster could not be listed, only {} was recorded: {err:#}", pod.namespaced_name());
    }
    println!("{}", report.path.display());
    Ok(())
}

pub(crate) fn build_config(args: &Args) -> anyhow::Result<SnapshotConfig> {
    let mut config = match &args.config {
        Some(path) => SnapshotConfig::from_yaml_file(path)?,
        None => SnapshotConfig::default(),
    };

    if let Some(output) = &args.output {
        config.output_path.clone_from(output);
    }
    config.unique_output |= args.unique_output;
    if args.strict {
        config.encode_mode = EncodeMode::Strict;
    }

    Ok(config)
}

pub(crate) fn load_pod(path: &Path) -> anyhow::Result<corev1::Pod> {
    let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    serde_yaml::from_reader(file).with_context(|| format!("could not parse pod from {}", path.display()))
}

fn load_cluster_file(path: &Path) -> anyhow::Result<ClusterView> {
    let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    ClusterView::from_list_reader(file)
}

async fn list_live_cluster() -> anyhow::Result<ClusterView> {
    let client = kube::Client::try_default().await.context("could not connect to cluster")?;
    let nodes = Api::<corev1::Node>::all(client.clone()).list(&ListParams::default()).await?;
    let pods = Api::<corev1::Pod>::all(client).list(&ListParams::default()).await?;

    info!("listed {} nodes and {} pods", nodes.items.len(), pods.items.len());
    Ok(ClusterView::from_objects(nodes.items, pods.items))
}
