/// One NCBI translation table in the layout NCBI publishes them: 64 residues
/// and 64 start flags, codons ordered with T, C, A, G varying fastest in the
/// third position.
pub(crate) struct RawTable {
    pub id: u8,
    pub name: &'static str,
    pub residues: &'static [u8; 64],
    pub starts: &'static [u8; 64],
}

pub(crate) const RAW_TABLES: [RawTable; 18] = [
    RawTable {
        id: 1,
        name: "Standard",
        residues: b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: b"---M---------------M---------------M----------------------------",
    },
    RawTable {
        id: 2,
        name: "Vertebrate Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG",
        starts: b"--------------------------------MMMM---------------M------------",
    },
    RawTable {
        id: 3,
        name: "Yeast Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: b"----------------------------------MM----------------------------",
    },
    RawTable {
        id: 4,
        name: "Mold, Protozoan, Coelenterate Mitochondrial; Mycoplasma/Spiroplasma",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: b"--MM---------------M------------MMMM---------------M------------",
    },
    RawTable {
        id: 5,
        name: "Invertebrate Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG",
        starts: b"---M----------------------------MMMM---------------M------------",
    },
    RawTable {
        id: 6,
        name: "Ciliate, Dasycladacean and Hexamita Nuclear",
        residues: b"FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: b"-----------------------------------M----------------------------",
    },
    RawTable {
        id: 9,
        name: "Echinoderm and Flatworm Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
        starts: b"-----------------------------------M---------------M------------",
    },
    RawTable {
        id: 10,
        name: "Euplotid Nuclear",
        residues: b"FFLLSSSSYY**CCCWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: b"-----------------------------------M----------------------------",
    },
    RawTable {
        id: 11,
        name: "Bacterial, Archaeal and Plant Plastid",
        residues: b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: b"---M---------------M------------MMMM---------------M------------",
    },
    RawTable {
        id: 12,
        name: "Alternative Yeast Nuclear",
        residues: b"FFLLSSSSYY**CC*WLLLSPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: b"-------------------M---------------M----------------------------",
    },
    RawTable {
        id: 13,
        name: "Ascidian Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSGGVVVVAAAADDEEGGGG",
        starts: b"---M------------------------------MM---------------M------------",
    },
    RawTable {
        id: 14,
        name: "Alternative Flatworm Mitochondrial",
        residues: b"FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
        starts: b"-----------------------------------M----------------------------",
    },
    RawTable {
        id: 16,
        name: "Chlorophycean Mitochondrial",
        residues: b"FFLLSSSSYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: b"-----------------------------------M----------------------------",
    },
    RawTable {
        id: 21,
        name: "Trematode Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
        starts: b"-----------------------------------M---------------M------------",
    },
    RawTable {
        id: 22,
        name: "Scenedesmus obliquus Mitochondrial",
        residues: b"FFLLSS*SYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: b"-----------------------------------M----------------------------",
    },
    RawTable {
        id: 23,
        name: "Thraustochytrium Mitochondrial",
        residues: b"FF*LSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: b"--------------------------------M--M---------------M------------",
    },
    RawTable {
        id: 24,
        name: "Rhabdopleuridae Mitochondrial",
        residues: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG",
        starts: b"---M---------------M---------------M---------------M------------",
    },
    RawTable {
        id: 25,
        name: "Candidate Division SR1 and Gracilibacteria",
        residues: b"FFLLSSSSYY**CCGWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: b"---M-------------------------------M---------------M------------",
    },
];
