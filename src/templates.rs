use std::sync::OnceLock;

use minijinja::{Environment, UndefinedBehavior, Value, context};

use crate::error::ScaffoldError;

pub const SAMPLES_FILE: &str = "samples_id.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LablogTemplate {
    pub stage: &'static str,
    pub body: &'static str,
}

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn environment() -> &'static Environment<'static> {
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env
    })
}

pub fn assembly_context() -> Value {
    context! {
        samples_file => SAMPLES_FILE,
    }
}

impl LablogTemplate {
    pub fn render(&self, ctx: &Value) -> Result<String, ScaffoldError> {
        environment()
            .render_str(self.body, ctx)
            .map_err(|err| ScaffoldError::Template {
                stage: self.stage.to_string(),
                message: err.to_string(),
            })
    }
}

pub const ANALYSIS: LablogTemplate = LablogTemplate {
    stage: "ANALYSIS",
    body: r#"cd 00-reads; cat ../{{samples_file}} | xargs -I % echo "ln -s ../../RAW/%_*R1*.fastq.gz %_R1.fastq.gz" | bash; cd -
cd 00-reads; cat ../{{samples_file}} | xargs -I % echo "ln -s ../../RAW/%_*R2*.fastq.gz %_R2.fastq.gz" | bash; cd -
"#,
};

pub const ASSEMBLY_ANALYSIS: LablogTemplate = LablogTemplate {
    stage: "ANALYSIS01_ASSEMBLY",
    body: r#"ln -s ../00-reads .
ln -s ../{{samples_file}} .
ln -s /processing_Data/bioinformatics/pipelines/bacterial_qc .
#conda activate nextflow
echo 'nextflow run /processing_Data/bioinformatics/pipelines/bacterial_assembly-nf/main.nf -bg -resume --reads "00-reads/*_R{1,2}.fastq.gz" --fasta ../../REFERENCES/GCF_002072775.2_ASM207277v2_genomic.fna --gtf ../../REFERENCES/GCF_002072775.2_ASM207277v2_genomic.gff --outdir 03-assembly -profile hpc_isciii' > _01_nf_assembly.sh
#nohup bash _01_nf_assembly.sh &> $(date '+%Y%m%d')_assembly01.log &
"#,
};

pub const PREPROCESSING: LablogTemplate = LablogTemplate {
    stage: "01-preprocessing",
    body: r#"cat ../{{samples_file}} | while read in; do echo "mkdir $in;qsub -V -b y -j y -cwd -N TRIMMOMATIC.$in -q all.q@obelix03 -q all.q@obelix09,all.q@obelix10,all.q@obelix11 -pe openmp 10 java -jar -Djava.io.tmpdir=../../TMP/ /opt/Trimmomatic-0.33/trimmomatic-0.33.jar PE -threads 10 -phred33 ../00-reads/"$in"_R1.fastq.gz ../00-reads/"$in"_R2.fastq.gz $in/"$in"_R1_filtered.fastq $in/"$in"_R1_unpaired.fastq $in/"$in"_R2_filtered.fastq $in/"$in"_R2_unpaired.fastq ILLUMINACLIP:/opt/Trimmomatic/adapters/NexteraPE-PE.fa:2:30:10 SLIDINGWINDOW:4:20 MINLEN:50"; done >> _01_preprocess.sh
"#,
};

pub const KMERFINDER: LablogTemplate = LablogTemplate {
    stage: "02-kmerfinder",
    body: r#"#module load singularity/singularity-2.6.0

kmerFinder_DB=/processing_Data/bioinformatics/references/kmerfinder/20190108_stable_dirs/bacteria
kmerFinder_path=/processing_Data/bioinformatics/pipelines/kmerfinder_v3.0.simg

cat ../{{samples_file}} | xargs -I % echo "qsub -V -b y -j y -cwd -N KMERFINDER -q all.q@obelix05 -q all.q@obelix04 singularity run --bind $PWD:/media --bind $kmerFinder_DB:/mnt --bind ../01-preprocessing:/workdir $kmerFinder_path -i /workdir/%/%_R1_filtered.fastq.gz /workdir/%/%_R2_filtered.fastq.gz -o /media/% -db /mnt/bacteria.ATG -tax /mnt/bacteria.name -x" > _01_kmerfinder.sh

echo "cat ../{{samples_file}} | xargs -I % awk '{FS=\"\t\"} NR==2 {print \$1}' %/results.txt | awk '{count[\$0]++} END{for (i in count) {print count[i], i}}' | sort -nr" > _02_find_common_reference.sh
echo "bash _02_find_common_reference.sh | head -n1 | tr ' ' '\t' | cut -f2 | while read in; do bash /processing_Data/bioinformatics/references/bacteria/download_reference.sh \${in} ../../../REFERENCES/; done" > _03_download_reference.sh
"#,
};

pub const STATS: LablogTemplate = LablogTemplate {
    stage: "99-stats",
    body: r#"python3 ../bacterial_qc/parse_kmerfinder.py --path ../02-kmerfinder --output_bn kmerfinder.bn --output_csv kmerfinder.csv
"#,
};
