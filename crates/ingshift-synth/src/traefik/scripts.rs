//! Install, verify, DNS and cleanup files for the Traefik path

use std::fmt::Write as _;

use ingshift_model::{ArtifactCategory, GeneratedArtifact, Route};

use crate::config::SynthConfig;

const LB_ADDRESS: &str = "{{ $ing := index .status.loadBalancer.ingress 0 }}{{ if $ing.ip }}{{ $ing.ip }}{{ else }}{{ $ing.hostname }}{{ end }}";

const VALUES: &str = r#"# Traefik chart values for running next to ingress-nginx
providers:
  # Serve Ingresses of class nginx and translate common nginx annotations
  kubernetesIngressNginx:
    enabled: true
  kubernetesIngress:
    enabled: true
    allowCrossNamespace: false
  kubernetesCRD:
    enabled: true

deployment:
  replicas: 2

affinity:
  podAntiAffinity:
    requiredDuringSchedulingIgnoredDuringExecution:
      - labelSelector:
          matchLabels:
            app.kubernetes.io/name: traefik
            app.kubernetes.io/instance: traefik
        topologyKey: kubernetes.io/hostname

podDisruptionBudget:
  enabled: true
  minAvailable: 1

service:
  enabled: true
  type: LoadBalancer

ports:
  web:
    port: 8000
    exposedPort: 80
  websecure:
    port: 8443
    exposedPort: 443
    tls:
      enabled: true

logs:
  general:
    level: INFO
  access:
    enabled: true
"#;

/// `01-install-traefik/helm-install.sh`
pub fn helm_install(config: &SynthConfig) -> GeneratedArtifact {
    let version = config
        .traefik_chart_version
        .as_deref()
        .map(|v| format!(" \\\n  --version \"{v}\""))
        .unwrap_or_default();
    let content = format!(
        r#"#!/bin/bash
# Install Traefik next to ingress-nginx; both controllers serve traffic until cutover
set -e

helm repo add traefik https://traefik.github.io/charts
helm repo update

helm upgrade --install traefik traefik/traefik \
  --namespace traefik \
  --create-namespace \
  --values values.yaml{version}

kubectl rollout status deployment/traefik -n traefik --timeout=120s

echo "Traefik is running. LoadBalancer service:"
kubectl get svc -n traefik traefik
echo "Next: bash ../04-verify.sh"
"#
    );
    GeneratedArtifact::new(
        "01-install-traefik/helm-install.sh",
        ArtifactCategory::Install,
        "Helm install script for Traefik",
        content,
    )
}

/// `01-install-traefik/values.yaml`
pub fn helm_values() -> GeneratedArtifact {
    GeneratedArtifact::new(
        "01-install-traefik/values.yaml",
        ArtifactCategory::Install,
        "Traefik Helm values",
        VALUES,
    )
}

/// `04-verify.sh`, checking every host through the Traefik address
pub fn verify(routes: &[&Route]) -> GeneratedArtifact {
    let mut checks = String::new();
    for route in routes {
        for host in &route.hosts {
            let _ = write!(
                checks,
                "echo \"{qualified} -> {host}\"\n\
                 curl -s --connect-to \"{host}:80:${{TRAEFIK_IP}}:80\" \"http://{host}\" -o /dev/null -w \"HTTP %{{http_code}}\\n\" || true\n",
                qualified = route.qualified_name(),
            );
        }
    }
    let content = format!(
        r#"#!/bin/bash
# Send each migrated host to Traefik directly, before any DNS change
set -e

TRAEFIK_IP=$(kubectl get svc -n traefik traefik -o go-template='{LB_ADDRESS}' 2>/dev/null || echo "")
if [ -z "$TRAEFIK_IP" ]; then
  echo "Traefik has no LoadBalancer address yet"
  kubectl get svc -n traefik traefik
  exit 1
fi
echo "Traefik: $TRAEFIK_IP"

{checks}
echo "Dashboard: kubectl port-forward -n traefik svc/traefik 9000:9000"
echo "When every host answers as expected, continue with 05-dns-migration.md"
"#
    );
    GeneratedArtifact::new(
        "04-verify.sh",
        ArtifactCategory::Verify,
        "Check every host through Traefik before DNS cutover",
        content,
    )
}

/// `05-dns-migration.md`
pub fn dns_guide() -> GeneratedArtifact {
    let content = format!(
        r#"# DNS cutover

Both controllers now watch the same Ingress objects. NGINX still takes all
production traffic; Traefik has its own LoadBalancer address.

## 1. Collect both addresses

```bash
NGINX_IP=$(kubectl get svc -n ingress-nginx ingress-nginx-controller -o go-template='{LB_ADDRESS}')
TRAEFIK_IP=$(kubectl get svc -n traefik traefik -o go-template='{LB_ADDRESS}')
echo "nginx:   $NGINX_IP"
echo "traefik: $TRAEFIK_IP"
```

## 2. Lower the TTL

Drop the record TTL to about 60 seconds a day ahead so a rollback is quick.

## 3. Add Traefik to the records

Publish the Traefik address next to the NGINX one. Clients now reach both.

## 4. Watch both controllers

```bash
kubectl logs -n ingress-nginx -l app.kubernetes.io/name=ingress-nginx -f
kubectl logs -n traefik -l app.kubernetes.io/name=traefik -f
```

## 5. Remove NGINX from the records

Keep NGINX running for 24 to 48 hours afterwards, since some resolvers
ignore TTLs. Then continue with `06-cleanup/`.

## Rollback

Remove the Traefik address from the records. Traffic returns to NGINX once
the TTL expires.
"#
    );
    GeneratedArtifact::new(
        "05-dns-migration.md",
        ArtifactCategory::Guide,
        "DNS cutover guide",
        content,
    )
}

/// `06-cleanup/01-preserve-ingressclass.yaml`
pub fn preserve_ingress_class(config: &SynthConfig) -> GeneratedArtifact {
    let class = &config.default_ingress_class;
    let content = format!(
        r#"# Apply before uninstalling ingress-nginx so the IngressClass survives.
# Traefik keeps serving Ingresses of this class through kubernetesIngressNginx.
apiVersion: networking.k8s.io/v1
kind: IngressClass
metadata:
  name: {class}
  annotations:
    ingressclass.kubernetes.io/is-default-class: "false"
    helm.sh/resource-policy: keep
spec:
  controller: k8s.io/ingress-nginx
"#
    );
    GeneratedArtifact::new(
        "06-cleanup/01-preserve-ingressclass.yaml",
        ArtifactCategory::Cleanup,
        "Keep the IngressClass when ingress-nginx is removed",
        content,
    )
}

/// `06-cleanup/02-remove-nginx.sh`
pub fn remove_nginx(config: &SynthConfig) -> GeneratedArtifact {
    let class = &config.default_ingress_class;
    let content = format!(
        r#"#!/bin/bash
# Remove ingress-nginx once Traefik carries all traffic and DNS has settled
set -e

kubectl apply -f 01-preserve-ingressclass.yaml
kubectl annotate ingressclass {class} helm.sh/resource-policy=keep --overwrite

kubectl delete validatingwebhookconfiguration ingress-nginx-admission --ignore-not-found
kubectl delete mutatingwebhookconfiguration ingress-nginx-admission --ignore-not-found

if helm list -n ingress-nginx | grep -q ingress-nginx; then
  helm uninstall ingress-nginx -n ingress-nginx
else
  echo "No ingress-nginx Helm release found; remove the controller manually"
fi

kubectl get ingressclass {class}
kubectl delete namespace ingress-nginx --ignore-not-found

echo "ingress-nginx removed. Ingresses now served by Traefik:"
kubectl get ingress --all-namespaces
"#
    );
    GeneratedArtifact::new(
        "06-cleanup/02-remove-nginx.sh",
        ArtifactCategory::Cleanup,
        "Remove ingress-nginx after cutover",
        content,
    )
}
